//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a character in the external attribute source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for one battle run (used to correlate tracing output)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleRunId(pub Uuid);

impl BattleRunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BattleRunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BattleRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the two teams in a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// The six named attributes reported by the attribute source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Intelligence,
    Strength,
    Speed,
    Durability,
    Power,
    Combat,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Intelligence,
        Attribute::Strength,
        Attribute::Speed,
        Attribute::Durability,
        Attribute::Power,
        Attribute::Combat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Intelligence => "intelligence",
            Attribute::Strength => "strength",
            Attribute::Speed => "speed",
            Attribute::Durability => "durability",
            Attribute::Power => "power",
            Attribute::Combat => "combat",
        }
    }
}

/// The three attack types every character can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackType {
    Mental,
    Strong,
    Fast,
}

impl AttackType {
    pub const ALL: [AttackType; 3] = [AttackType::Mental, AttackType::Strong, AttackType::Fast];

    pub fn name(self) -> &'static str {
        match self {
            AttackType::Mental => "mental",
            AttackType::Strong => "strong",
            AttackType::Fast => "fast",
        }
    }
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
