//! Structured battle log entries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hit points as they appear in the log: fixed two decimal places.
///
/// The log truncates precision, so records compare equal on this text and
/// never on the underlying float.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HpReading(String);

impl HpReading {
    pub fn from_value(hp: f64) -> Self {
        Self(format!("{:.2}", hp))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<f64> for HpReading {
    fn from(hp: f64) -> Self {
        Self::from_value(hp)
    }
}

impl fmt::Display for HpReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when text is not a two-decimal number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidHpReading(pub String);

impl fmt::Display for InvalidHpReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not a two-decimal hit point value", self.0)
    }
}

impl std::error::Error for InvalidHpReading {}

impl FromStr for HpReading {
    type Err = InvalidHpReading;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('-').unwrap_or(s);
        let valid = match digits.split_once('.') {
            Some((whole, fraction)) => {
                !whole.is_empty()
                    && whole.bytes().all(|b| b.is_ascii_digit())
                    && fraction.len() == 2
                    && fraction.bytes().all(|b| b.is_ascii_digit())
            }
            None => false,
        };
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidHpReading(s.to_string()))
        }
    }
}

/// A combatant as it stood when the round began
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundParticipant {
    pub name: String,
    pub hp: HpReading,
}

impl RoundParticipant {
    pub fn new(name: impl Into<String>, hp: impl Into<HpReading>) -> Self {
        Self {
            name: name.into(),
            hp: hp.into(),
        }
    }
}

/// One completed round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEvent {
    pub round: u32,
    pub attacker: RoundParticipant,
    pub defender: RoundParticipant,
    pub winner: String,
}

/// Everything the battle log file holds: the two teams, every round in
/// order, and the winning team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub teams: [String; 2],
    pub rounds: Vec<RoundEvent>,
    pub winner: String,
}
