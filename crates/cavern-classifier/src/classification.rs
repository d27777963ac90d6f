use serde::{Deserialize, Serialize};

/// Outcome of classifying a room against a player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
    derive_more::IsVariant,
)]
pub enum Classification {
    Accepted,
    Rejected,
    /// Neither class is preferred, such as an exact posterior tie or an
    /// undefined feature.
    Undecided,
}

impl Classification {
    #[must_use]
    pub const fn from_accepted(accepted: bool) -> Self {
        if accepted {
            Self::Accepted
        } else {
            Self::Rejected
        }
    }

    /// Binary code stored in result files: `1` when accepted, `0` otherwise.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Accepted => 1,
            Self::Rejected | Self::Undecided => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code() {
        assert_eq!(Classification::Accepted.code(), 1);
        assert_eq!(Classification::Rejected.code(), 0);
        assert_eq!(Classification::Undecided.code(), 0);
        assert_eq!(Classification::from_accepted(true), Classification::Accepted);
        assert!(Classification::from_accepted(false).is_rejected());
    }

    #[test]
    fn test_parse() {
        assert_eq!("Undecided".parse::<Classification>().unwrap(), Classification::Undecided);
        assert_eq!(Classification::Accepted.to_string(), "Accepted");
    }
}
