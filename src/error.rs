//! Error types for the rules engine

use crate::core::{CardId, DamageSource};
use crate::zones::Zone;
use thiserror::Error;

/// Expected, recoverable failures
///
/// Phase logic treats these as "cannot act" and carries on with the round.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    #[error("card {0} has no action points left")]
    NoActionPoints(CardId),

    #[error("card {0} has insufficient action points")]
    InsufficientResource(CardId),

    #[error("card {card} is not in {zone}")]
    NotInZone { card: CardId, zone: Zone },

    #[error("card {card} needs a {required} damage source in hand")]
    MissingDamageSource { card: CardId, required: DamageSource },

    #[error("no valid target")]
    NoTarget,

    #[error("card {0} is not eligible for this action")]
    NotEligible(CardId),
}

#[derive(Error, Debug)]
pub enum RampartError {
    #[error("Precondition failed: {0}")]
    PreconditionFailed(#[from] Precondition),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl RampartError {
    /// True for failures the round can absorb as a no-op
    pub fn is_precondition(&self) -> bool {
        matches!(self, RampartError::PreconditionFailed(_))
    }

    pub fn precondition(&self) -> Option<&Precondition> {
        match self {
            RampartError::PreconditionFailed(p) => Some(p),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RampartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_classification() {
        let err: RampartError = Precondition::NoTarget.into();
        assert!(err.is_precondition());
        assert_eq!(err.precondition(), Some(&Precondition::NoTarget));

        let fatal = RampartError::InvariantViolation("card 3 in two zones".to_string());
        assert!(!fatal.is_precondition());
        assert!(fatal.precondition().is_none());
    }

    #[test]
    fn test_error_messages() {
        let err: RampartError = Precondition::NotInZone {
            card: CardId::new(7),
            zone: Zone::Wall,
        }
        .into();
        assert_eq!(err.to_string(), "Precondition failed: card 7 is not in Wall");

        let missing = Precondition::MissingDamageSource {
            card: CardId::new(4),
            required: DamageSource::Magic,
        };
        assert_eq!(missing.to_string(), "card 4 needs a Magic damage source in hand");
        assert!(std::error::Error::source(&missing).is_none());
    }
}
