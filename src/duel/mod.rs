//! Battle resolution between two teams
//!
//! A battle is a sequence of rounds. Each round pits one random member of
//! each team against the other; the loser leaves its team and the winner
//! goes back with full hit points. The first team left without members
//! loses the battle.

pub mod resolver;

use crate::battle_log::{BattleRecord, RoundEvent};
use crate::character::Character;
use crate::core::types::{AttackType, Side};
use serde::Serialize;

pub use resolver::DuelResolver;

/// One attack inside a round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Move {
    /// 1-based within the round
    pub number: u32,
    pub attacker: String,
    pub defender: String,
    pub attack: AttackType,
    pub damage: f64,
    /// Defender hit points after the blow
    pub defender_hp: f64,
}

/// A finished round: the log entry plus the detail the log does not keep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub event: RoundEvent,
    pub winner_side: Side,
    pub defeated: Character,
    pub moves: Vec<Move>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleOutcome {
    pub winner: Side,
    pub winning_team: String,
    pub rounds: Vec<RoundSummary>,
    /// Same content as the battle log
    pub record: BattleRecord,
}

impl BattleOutcome {
    pub fn total_moves(&self) -> usize {
        self.rounds.iter().map(|r| r.moves.len()).sum()
    }
}
