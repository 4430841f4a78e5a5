//! Card catalog and CSV catalog loader
//!
//! The catalog is the validated, in-memory table the engine builds decks
//! from. Ability text is classified into [`AbilityKind`] here, once; the
//! game never looks at catalog text again.

use crate::core::{
    AbilityKind, AttackType, CardClass, CardDefinition, CardIdentity, CatalogId, Rank, SubClass,
    Suit,
};
use crate::{RampartError, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Validated card catalog: one definition per standard card plus the Joker
#[derive(Debug, Clone)]
pub struct Catalog {
    definitions: Vec<Arc<CardDefinition>>,
    joker: Arc<CardDefinition>,
}

impl Catalog {
    pub fn new(definitions: Vec<Arc<CardDefinition>>, joker: Arc<CardDefinition>) -> Result<Self> {
        if definitions.is_empty() {
            return Err(RampartError::InvalidCatalog(
                "catalog has no card definitions".to_string(),
            ));
        }
        if !joker.is_joker() {
            return Err(RampartError::InvalidCatalog(format!(
                "joker slot holds {}",
                joker.identity
            )));
        }
        if let Some(dup) = definitions.iter().find(|d| d.is_joker()) {
            return Err(RampartError::InvalidCatalog(format!(
                "joker listed among standard cards (row {})",
                dup.catalog_id.0
            )));
        }
        Ok(Catalog { definitions, joker })
    }

    pub fn definitions(&self) -> &[Arc<CardDefinition>] {
        &self.definitions
    }

    pub fn joker(&self) -> &Arc<CardDefinition> {
        &self.joker
    }

    pub fn get(&self, identity: CardIdentity) -> Option<&Arc<CardDefinition>> {
        if identity.is_joker() {
            return Some(&self.joker);
        }
        self.definitions.iter().find(|d| d.identity == identity)
    }

    /// Number of standard definitions (the Joker is not counted)
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Cards in one player's deck: every definition twice plus two Jokers
    pub fn deck_size(&self) -> usize {
        self.definitions.len() * 2 + 2
    }
}

/// One raw CSV row, before validation
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Card Name")]
    name: String,
    #[serde(rename = "Character Class")]
    class: String,
    #[serde(rename = "Sub Class")]
    sub_class: String,
    #[serde(rename = "Damage Bonus")]
    damage_bonus: String,
    #[serde(rename = "Attack Type")]
    attack_type: String,
    #[serde(rename = "Special Ability Trigger")]
    special_ability_trigger: String,
    #[serde(rename = "Attack Value")]
    attack_value: String,
    #[serde(rename = "Action Point")]
    action_point: String,
    #[serde(rename = "Damage Points")]
    damage_points: String,
    #[serde(rename = "Cast Ability")]
    cast_ability: String,
    #[serde(rename = "Special Ability")]
    special_ability: String,
    #[serde(rename = "Is A Character")]
    is_character: String,
}

/// Loader for catalogs stored as CSV
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a CSV file
    pub fn load_from_file(path: &Path) -> Result<Catalog> {
        let file = std::fs::File::open(path)?;
        Self::load_from_reader(file)
    }

    /// Load a catalog from CSV text
    pub fn parse(content: &str) -> Result<Catalog> {
        Self::load_from_reader(content.as_bytes())
    }

    pub fn load_from_reader<R: Read>(reader: R) -> Result<Catalog> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut definitions = Vec::new();
        let mut joker = None;
        for (row_idx, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            let row = row?;
            let definition = Self::definition_from_row(CatalogId(row_idx as u32), &row)
                .map_err(|e| match e {
                    RampartError::InvalidCatalog(msg) => {
                        RampartError::InvalidCatalog(format!("row {} ({}): {msg}", row_idx + 1, row.name))
                    }
                    other => other,
                })?;
            if definition.is_joker() {
                joker = Some(Arc::new(definition));
            } else {
                definitions.push(Arc::new(definition));
            }
        }

        let joker = match joker {
            Some(joker) => joker,
            None => Arc::new(crate::loader::standard::joker_definition(CatalogId(
                definitions.len() as u32,
            ))),
        };
        Catalog::new(definitions, joker)
    }

    fn definition_from_row(catalog_id: CatalogId, row: &CatalogRow) -> Result<CardDefinition> {
        let identity: CardIdentity = row.name.parse().map_err(RampartError::InvalidCatalog)?;
        let class = if identity.is_joker() {
            CardClass::Joker
        } else if identity.rank() == Some(Rank::TRAP) && is_blank(&row.class) {
            CardClass::Trap
        } else {
            row.class.parse().map_err(RampartError::InvalidCatalog)?
        };
        let sub_class: SubClass = row.sub_class.parse().map_err(RampartError::InvalidCatalog)?;
        let attack_type: AttackType = row.attack_type.parse().map_err(RampartError::InvalidCatalog)?;

        let is_character = parse_flag("Is A Character", &row.is_character)?;
        if is_character && !class.is_character() {
            return Err(RampartError::InvalidCatalog(format!(
                "flagged as a character but class is {class:?}"
            )));
        }
        // Validated for shape only: the round baseline comes from the capability flags
        parse_number("Action Point", &row.action_point)?;

        let two_action_point_baseline = is_two_eyed(identity);
        Ok(CardDefinition {
            catalog_id,
            identity,
            class,
            sub_class,
            attack_type,
            attack_value: parse_number("Attack Value", &row.attack_value)?,
            damage_bonus: parse_number("Damage Bonus", &row.damage_bonus)?,
            max_damage_points: parse_number("Damage Points", &row.damage_points)?,
            max_action_points: CardDefinition::baseline_for(is_character, two_action_point_baseline),
            is_character,
            special_ability_trigger: parse_flag("Special Ability Trigger", &row.special_ability_trigger)?,
            cast_ability: classify_ability(&row.cast_ability)?,
            special_ability: classify_ability(&row.special_ability)?,
            two_action_point_baseline,
        })
    }
}

/// Jack of Clubs and Jack of Diamonds act twice per round
pub fn is_two_eyed(identity: CardIdentity) -> bool {
    matches!(
        identity,
        CardIdentity::Standard {
            rank: Rank::Jack,
            suit: Suit::Clubs | Suit::Diamonds
        }
    )
}

fn is_blank(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s == "-"
}

fn parse_number(column: &str, value: &str) -> Result<u32> {
    if is_blank(value) {
        return Ok(0);
    }
    value.trim().parse::<u32>().map_err(|_| {
        RampartError::InvalidCatalog(format!("{column}: expected a non-negative integer, got '{value}'"))
    })
}

fn parse_flag(column: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" | "-" | "" => Ok(false),
        other => Err(RampartError::InvalidCatalog(format!(
            "{column}: expected yes/no, got '{other}'"
        ))),
    }
}

/// Classify free ability text into the closed ability taxonomy
///
/// "-" or blank means no ability. Unrecognised text is a catalog error.
pub fn classify_ability(text: &str) -> Result<Option<AbilityKind>> {
    if is_blank(text) {
        return Ok(None);
    }
    let lower = text.to_ascii_lowercase();

    let kind = if lower.contains("draws 2 cards") {
        AbilityKind::DrawTwoCards
    } else if lower.contains("ammo dealing") {
        AbilityKind::AmmoRangedDamage(amount_in(text)?)
    } else if lower.contains("magical block or damage") {
        AbilityKind::MagicRangedOrBlock(amount_in(text)?)
    } else if lower.contains("armor block or damage") {
        AbilityKind::ArmorBlockOrDamage
    } else if lower.contains("instant block") {
        AbilityKind::InstantBlock
    } else if lower.contains("uber damage") {
        AbilityKind::UberUnblockableDamage {
            base: AbilityKind::JOKER_BASE_DAMAGE,
        }
    } else if lower.contains("deals unblockable") {
        AbilityKind::JokerBonusDamage
    } else if lower.contains("not destroyed by magic") {
        AbilityKind::magic_ranged_immunity()
    } else if lower.contains("destroys any character that used a successful melee attack") {
        AbilityKind::RetributionOnMeleeHit
    } else if lower.trim() == "trap" {
        // Trap behaviour is keyed on rank, not on an ability
        return Ok(None);
    } else {
        return Err(RampartError::InvalidCatalog(format!(
            "unrecognised ability text '{text}'"
        )));
    };
    Ok(Some(kind))
}

/// First integer in the text ("Ammo dealing 2 ranged damage" -> 2)
fn amount_in(text: &str) -> Result<u32> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| RampartError::InvalidCatalog(format!("no amount in ability text '{text}'")))
}
