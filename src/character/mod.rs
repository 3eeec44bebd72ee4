//! Characters and their combat lifecycle
//!
//! A character starts as a `Recruit`: identity, base attributes and a
//! stamina roll, but no combat numbers. Once its team's alignment is known
//! the recruit is consumed by `Recruit::derive` and becomes a `Character`
//! with filiation, derived stats, hit points and attack values. There is no
//! way back; the only mutation after that is hit point loss and the full
//! reset granted to a round winner.

pub mod stats;

use crate::core::types::{AttackType, CharacterId};
use rand::Rng;
use serde::Serialize;
pub use stats::{AttackValues, AttributeSet};

/// A fetched character waiting for its team's alignment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recruit {
    pub id: CharacterId,
    pub name: String,
    pub alignment: String,
    pub base: AttributeSet,
    /// Actual stamina (AS), fixed at creation
    pub stamina: u8,
}

impl Recruit {
    /// Create a recruit, drawing its actual stamina
    pub fn new<R: Rng + ?Sized>(
        id: CharacterId,
        name: String,
        alignment: String,
        base: AttributeSet,
        rng: &mut R,
    ) -> Self {
        Self::with_stamina(id, name, alignment, base, stats::roll_stamina(rng))
    }

    pub fn with_stamina(
        id: CharacterId,
        name: String,
        alignment: String,
        base: AttributeSet,
        stamina: u8,
    ) -> Self {
        Self {
            id,
            name,
            alignment,
            base,
            stamina: stamina.min(stats::MAX_STAMINA),
        }
    }

    /// Derive combat numbers against the team alignment, rolling filiation
    pub fn derive<R: Rng + ?Sized>(self, team_alignment: &str, rng: &mut R) -> Character {
        let roll = stats::roll_filiation(rng);
        self.derive_with_roll(team_alignment, roll)
    }

    pub fn derive_with_roll(self, team_alignment: &str, roll: u8) -> Character {
        let filiation = stats::filiation(&self.alignment, team_alignment, roll);
        let derived = stats::derive_stats(&self.base, self.stamina, filiation);
        let hit_points = stats::derive_hit_points(&derived, self.stamina);
        let attacks = stats::derive_attacks(&derived, filiation);

        Character {
            id: self.id,
            name: self.name,
            alignment: self.alignment,
            base: self.base,
            stamina: self.stamina,
            filiation,
            stats: derived,
            hit_points,
            attacks,
        }
    }
}

/// A fully derived combatant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub alignment: String,
    pub base: AttributeSet,
    pub stamina: u8,
    /// Filiation coefficient (FB)
    pub filiation: f64,
    pub stats: AttributeSet,
    pub hit_points: f64,
    pub attacks: AttackValues,
}

/// One attack landed on a defender
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Strike {
    pub attack: AttackType,
    pub damage: f64,
}

impl Character {
    /// Pick an attack type uniformly and apply its damage to `defender`
    pub fn attack<R: Rng + ?Sized>(&self, defender: &mut Character, rng: &mut R) -> Strike {
        let attack = AttackType::ALL[rng.gen_range(0..AttackType::ALL.len())];
        self.strike(defender, attack)
    }

    /// Apply a specific attack type to `defender`
    pub fn strike(&self, defender: &mut Character, attack: AttackType) -> Strike {
        let damage = self.attacks.get(attack);
        defender.hit_points -= damage;
        Strike { attack, damage }
    }

    /// Defeat is strictly negative hit points; exactly zero still stands
    pub fn is_defeated(&self) -> bool {
        self.hit_points < 0.0
    }

    /// Restore full hit points, re-derived from stats and stamina
    pub fn reset_hit_points(&mut self) {
        self.hit_points = self.full_hit_points();
    }

    pub fn full_hit_points(&self) -> f64 {
        stats::derive_hit_points(&self.stats, self.stamina)
    }
}
