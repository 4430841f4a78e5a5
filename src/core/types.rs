//! Strongly-typed card attributes
//!
//! Ranks, suits and the class tags a catalog row carries. Everything the
//! engine branches on is an enum here; nothing is matched by name at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::King,
        Rank::Queen,
        Rank::Jack,
        Rank::Ten,
        Rank::Nine,
        Rank::Eight,
        Rank::Seven,
        Rank::Six,
        Rank::Five,
        Rank::Four,
        Rank::Three,
        Rank::Two,
    ];

    /// The rank with ambush semantics when revealed from a wall
    pub const TRAP: Rank = Rank::Seven;

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
            Rank::Ace => "Ace",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2" | "two" => Ok(Rank::Two),
            "3" | "three" => Ok(Rank::Three),
            "4" | "four" => Ok(Rank::Four),
            "5" | "five" => Ok(Rank::Five),
            "6" | "six" => Ok(Rank::Six),
            "7" | "seven" => Ok(Rank::Seven),
            "8" | "eight" => Ok(Rank::Eight),
            "9" | "nine" => Ok(Rank::Nine),
            "10" | "ten" => Ok(Rank::Ten),
            "jack" | "j" => Ok(Rank::Jack),
            "queen" | "q" => Ok(Rank::Queen),
            "king" | "k" => Ok(Rank::King),
            "ace" | "a" => Ok(Rank::Ace),
            other => Err(format!("unknown rank '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn is_red(&self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
            Suit::Hearts => "Hearts",
            Suit::Spades => "Spades",
        };
        f.write_str(name)
    }
}

impl FromStr for Suit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clubs" => Ok(Suit::Clubs),
            "diamonds" => Ok(Suit::Diamonds),
            "hearts" => Ok(Suit::Hearts),
            "spades" => Ok(Suit::Spades),
            other => Err(format!("unknown suit '{other}'")),
        }
    }
}

/// Player display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: impl Into<String>) -> Self {
        PlayerName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PlayerName {
    fn from(s: String) -> Self {
        PlayerName(s)
    }
}

impl From<&str> for PlayerName {
    fn from(s: &str) -> Self {
        PlayerName(s.to_string())
    }
}

/// What is printed on the card face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardIdentity {
    Standard { rank: Rank, suit: Suit },
    Joker,
}

impl CardIdentity {
    pub fn rank(&self) -> Option<Rank> {
        match self {
            CardIdentity::Standard { rank, .. } => Some(*rank),
            CardIdentity::Joker => None,
        }
    }

    pub fn suit(&self) -> Option<Suit> {
        match self {
            CardIdentity::Standard { suit, .. } => Some(*suit),
            CardIdentity::Joker => None,
        }
    }

    pub fn is_joker(&self) -> bool {
        matches!(self, CardIdentity::Joker)
    }
}

impl fmt::Display for CardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardIdentity::Standard { rank, suit } => write!(f, "{rank} of {suit}"),
            CardIdentity::Joker => f.write_str("Joker"),
        }
    }
}

impl FromStr for CardIdentity {
    type Err = String;

    /// Parses "Queen of Hearts", "7 of Clubs" or "Joker"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("joker") {
            return Ok(CardIdentity::Joker);
        }
        let (rank, suit) = s
            .split_once(" of ")
            .ok_or_else(|| format!("expected '<rank> of <suit>', got '{s}'"))?;
        Ok(CardIdentity::Standard {
            rank: rank.parse()?,
            suit: suit.parse()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardClass {
    Warrior,
    Marksman,
    Mage,
    Item,
    Trap,
    Joker,
}

impl CardClass {
    pub fn is_character(&self) -> bool {
        matches!(self, CardClass::Warrior | CardClass::Marksman | CardClass::Mage)
    }
}

impl FromStr for CardClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warrior" => Ok(CardClass::Warrior),
            "marksman" => Ok(CardClass::Marksman),
            "mage" => Ok(CardClass::Mage),
            "item" | "-" | "" => Ok(CardClass::Item),
            "trap" => Ok(CardClass::Trap),
            "joker" => Ok(CardClass::Joker),
            other => Err(format!("unknown class '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubClass {
    HeavyArmor,
    LiteArmor,
    Arcane,
    None,
}

impl SubClass {
    /// Hand-card category a ranged character of this sub-class must discard
    pub fn damage_source(&self) -> Option<DamageSource> {
        match self {
            SubClass::LiteArmor => Some(DamageSource::Ammo),
            SubClass::Arcane => Some(DamageSource::Magic),
            SubClass::HeavyArmor | SubClass::None => None,
        }
    }
}

impl FromStr for SubClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heavy armor" | "heavyarmor" => Ok(SubClass::HeavyArmor),
            "lite armor" | "litearmor" | "light armor" => Ok(SubClass::LiteArmor),
            "arcane" => Ok(SubClass::Arcane),
            "-" | "" | "none" => Ok(SubClass::None),
            other => Err(format!("unknown sub-class '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackType {
    Melee,
    Ranged,
    None,
}

impl FromStr for AttackType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "melee" => Ok(AttackType::Melee),
            "ranged" => Ok(AttackType::Ranged),
            "-" | "" | "none" => Ok(AttackType::None),
            other => Err(format!("unknown attack type '{other}'")),
        }
    }
}

/// Category of incoming damage, used by immunities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageCategory {
    Melee,
    Ranged,
    Magic,
    /// Joker damage: unblockable and never ignored
    Uber,
}

/// Hand-card category consumed to authorize a ranged attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    Ammo,
    Magic,
}

impl fmt::Display for DamageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageSource::Ammo => f.write_str("Ammo"),
            DamageSource::Magic => f.write_str("Magic"),
        }
    }
}
