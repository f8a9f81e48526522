//! The three fixed positions that may conceal the token.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// One of the three slots on the table, numbered 1-3 from the left.
///
/// The table size is fixed, so an out-of-range slot cannot be constructed.
/// Raw numbers coming from a caller go through [`Slot::try_from`], which
/// rejects anything outside `1..=3` with a [`SlotError`] naming the input.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Slot {
    /// Left slot.
    One,
    /// Middle slot.
    Two,
    /// Right slot.
    Three,
}

impl Slot {
    /// All slots, left to right.
    pub const ALL: [Slot; 3] = [Slot::One, Slot::Two, Slot::Three];

    /// Returns the 1-based slot number.
    pub fn number(self) -> u8 {
        match self {
            Slot::One => 1,
            Slot::Two => 2,
            Slot::Three => 3,
        }
    }

    /// Returns the 0-based index into [`Slot::ALL`].
    pub fn index(self) -> usize {
        usize::from(self.number() - 1)
    }

    /// Creates a slot from a 0-based index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl TryFrom<i64> for Slot {
    type Error = SlotError;

    #[track_caller]
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Slot::One),
            2 => Ok(Slot::Two),
            3 => Ok(Slot::Three),
            other => Err(SlotError::new(other.to_string())),
        }
    }
}

impl TryFrom<u8> for Slot {
    type Error = SlotError;

    #[track_caller]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Slot::try_from(i64::from(value))
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> Self {
        slot.number()
    }
}

impl FromStr for Slot {
    type Err = SlotError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        match text.parse::<i64>() {
            Ok(number) => Slot::try_from(number),
            Err(_) => Err(SlotError::new(text.to_string())),
        }
    }
}

/// A slot outside `1..=3`.
///
/// No legitimate three-slot presentation can produce one, so this is a
/// caller contract violation rather than a game rule.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid slot `{}` (expected 1-3) at {}:{}", input, file, line)]
pub struct SlotError {
    /// The rejected input, as the caller gave it.
    pub input: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl SlotError {
    /// Creates a new slot error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(input: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            input,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_number_and_index_agree() {
        for slot in Slot::iter() {
            assert_eq!(usize::from(slot.number()), slot.index() + 1);
            assert_eq!(Slot::from_index(slot.index()), Some(slot));
        }
        assert_eq!(Slot::from_index(3), None);
    }

    #[test]
    fn test_try_from_rejects_out_of_range() {
        assert_eq!(Slot::try_from(2u8).map(Slot::number), Ok(2));
        let err = Slot::try_from(0u8).unwrap_err();
        assert_eq!(err.input, "0");
        assert!(Slot::try_from(4u8).is_err());
        assert!(err.to_string().contains("expected 1-3"));
    }

    #[test]
    fn test_parse_from_text() {
        assert_eq!(" 3 ".parse::<Slot>().ok(), Some(Slot::Three));
        assert!("9".parse::<Slot>().is_err());
    }

    #[test]
    fn test_parse_error_keeps_what_was_typed() {
        for input in ["256", "-1", "left", "99999999999999999999"] {
            let err = input.parse::<Slot>().unwrap_err();
            assert_eq!(err.input, input);
            assert!(err.to_string().contains(&format!("`{input}`")));
        }
        assert_eq!(Slot::try_from(300i64).unwrap_err().input, "300");
    }
}
