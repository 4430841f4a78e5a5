//! Interactive TUI controller for human players
//!
//! Reads player choices from stdin and displays game state using GameStateView

use crate::core::{CardId, PlayerId};
use crate::game::controller::{Constraint, DecisionProvider, DecisionRequest, GameStateView, Selection};
use smallvec::SmallVec;
use std::io::{self, BufRead, Write};

/// A controller that prompts a human player for decisions
pub struct InteractiveController {
    player_id: PlayerId,
    input: Box<dyn BufRead>,
}

impl InteractiveController {
    /// Create a new interactive controller reading from stdin
    pub fn new(player_id: PlayerId) -> Self {
        Self::with_reader(player_id, Box::new(io::BufReader::new(io::stdin())))
    }

    /// Read answers from any line source (scripted sessions, tests)
    pub fn with_reader(player_id: PlayerId, input: Box<dyn BufRead>) -> Self {
        InteractiveController { player_id, input }
    }

    /// Read one trimmed line; None at end of input
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{} ", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                eprintln!("Error reading input: {e}");
                None
            }
        }
    }

    /// Prompt until the input parses for the request's constraint
    ///
    /// Besides option numbers the player may type '?' for help or 'v' to
    /// view the board. End of input falls back to the first option or the
    /// empty subset.
    fn get_user_choice(&mut self, view: &GameStateView, request: &DecisionRequest) -> Selection {
        let count = request.options.len();
        loop {
            let prompt = match request.constraint {
                Constraint::ExactlyOne => format!("Choose 0-{}:", count.saturating_sub(1)),
                Constraint::AnySubset => "Choose any (space separated, empty for none):".to_string(),
            };
            let Some(input) = self.read_line(&prompt) else {
                return match request.constraint {
                    Constraint::ExactlyOne => Selection::One(0),
                    Constraint::AnySubset => Selection::none(),
                };
            };

            match input.as_str() {
                "?" => {
                    self.display_help();
                    continue;
                }
                "v" => {
                    self.display_board(view);
                    continue;
                }
                _ => {}
            }

            match request.constraint {
                Constraint::ExactlyOne => match input.parse::<usize>() {
                    Ok(choice) if choice < count => return Selection::One(choice),
                    _ => eprintln!("Invalid choice. Enter 0-{}.", count.saturating_sub(1)),
                },
                Constraint::AnySubset => {
                    let parsed: Result<SmallVec<[usize; 8]>, _> = input
                        .split(|c: char| c == ',' || c.is_whitespace())
                        .filter(|s| !s.is_empty())
                        .map(str::parse::<usize>)
                        .collect();
                    match parsed {
                        Ok(indices) => {
                            let selection = Selection::Many(indices);
                            if request.accepts(&selection) {
                                return selection;
                            }
                            eprintln!("Each number must be distinct and below {count}.");
                        }
                        Err(_) => eprintln!("Enter option numbers separated by spaces."),
                    }
                }
            }
        }
    }

    fn display_help(&self) {
        println!("\n=== Help ===");
        println!("  <n>      - choose option n");
        println!("  <n> <m>  - choose several options (when allowed)");
        println!("  ?        - show this help");
        println!("  v        - view the board");
        println!();
    }

    fn display_cards(&self, view: &GameStateView, label: &str, cards: &[CardId]) {
        println!("{label}:");
        if cards.is_empty() {
            println!("  (empty)");
        }
        for &card in cards {
            let name = view.card_name(card).unwrap_or_else(|| format!("card {card}"));
            println!(
                "  {} (DP {}, AP {})",
                name,
                view.damage_points(card),
                view.action_points(card)
            );
        }
    }

    fn display_board(&self, view: &GameStateView) {
        println!(
            "\n=== Round {} - {} ===",
            view.round_number(),
            view.phase()
        );
        self.display_cards(view, "Opponent field", view.opponent_field());
        self.display_cards(view, "Opponent battlement", view.opponent_battlement());
        println!(
            "Opponent wall: {} cards, hand: {} cards",
            view.opponent_wall_size(),
            view.opponent_hand_size()
        );
        self.display_cards(view, "Your field", view.field());
        self.display_cards(view, "Your battlement", view.battlement());
        println!("Your wall: {} cards, deck: {} cards", view.wall_size(), view.deck_size());
        println!("Your hand:");
        for &card in view.hand() {
            let name = view.card_name(card).unwrap_or_else(|| format!("card {card}"));
            println!("  {name}");
        }
        println!(
            "Score: you {}, opponent {}",
            view.score(view.player_id()),
            view.score(view.opponent_id())
        );
        println!();
    }
}

impl DecisionProvider for InteractiveController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn request_choice(&mut self, view: &GameStateView, request: &DecisionRequest) -> Selection {
        println!("\n[{:?}] player {}", request.kind, self.player_id);
        for (idx, option) in request.options.iter().enumerate() {
            println!("  [{}] {}", idx, view.describe_option(option));
        }
        self.get_user_choice(view, request)
    }

    fn on_game_end(&mut self, view: &GameStateView, won: bool) {
        println!("\n=== Game Over ===");
        println!("{}", if won { "You won!" } else { "You did not win." });
        println!(
            "Final score: you {}, opponent {}",
            view.score(view.player_id()),
            view.score(view.opponent_id())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameConfig;
    use crate::game::controller::{ChoiceOption, PromptKind};
    use crate::game::GameState;
    use smallvec::smallvec;
    use std::io::Cursor;

    #[test]
    fn test_reads_indices_and_retries() {
        let game = GameState::new_empty("Alice", "Bob", GameConfig::default());
        let [p1, _] = game.player_ids();
        let view = GameStateView::new(&game, p1);
        let input = Cursor::new("7\nabc\n1\n0 2\n");
        let mut controller = InteractiveController::with_reader(p1, Box::new(input));

        let one = DecisionRequest::one(p1, PromptKind::DrawCard, vec![ChoiceOption::Yes, ChoiceOption::No]);
        assert_eq!(controller.request_choice(&view, &one), Selection::One(1));

        let many = DecisionRequest::subset(p1, PromptKind::MoveToField, vec![ChoiceOption::Pass; 3]);
        assert_eq!(controller.request_choice(&view, &many), Selection::Many(smallvec![0, 2]));

        // End of input
        assert_eq!(controller.request_choice(&view, &one), Selection::One(0));
    }
}
