//! Stat derivation
//!
//! Pure functions turning raw base attributes into combat numbers.
//! Randomness enters only through the explicit `stamina` and filiation
//! `roll` arguments so every formula is reproducible in isolation.

use crate::core::types::{AttackType, Attribute};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Highest actual stamina a character can draw
pub const MAX_STAMINA: u8 = 10;

/// Highest filiation roll; FB ranges over 1..=10 or 1/10..=1
pub const MAX_FILIATION_ROLL: u8 = 9;

/// Minimum hit points of any derived character
pub const HP_FLOOR: f64 = 100.0;

/// One value per named attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSet {
    pub intelligence: f64,
    pub strength: f64,
    pub speed: f64,
    pub durability: f64,
    pub power: f64,
    pub combat: f64,
}

impl AttributeSet {
    /// Same value for every attribute
    pub fn uniform(value: f64) -> Self {
        Self {
            intelligence: value,
            strength: value,
            speed: value,
            durability: value,
            power: value,
            combat: value,
        }
    }

    pub fn get(&self, attr: Attribute) -> f64 {
        match attr {
            Attribute::Intelligence => self.intelligence,
            Attribute::Strength => self.strength,
            Attribute::Speed => self.speed,
            Attribute::Durability => self.durability,
            Attribute::Power => self.power,
            Attribute::Combat => self.combat,
        }
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            intelligence: f(self.intelligence),
            strength: f(self.strength),
            speed: f(self.speed),
            durability: f(self.durability),
            power: f(self.power),
            combat: f(self.combat),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, f64)> + '_ {
        Attribute::ALL.into_iter().map(move |attr| (attr, self.get(attr)))
    }
}

/// Damage dealt by each attack type
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackValues {
    pub mental: f64,
    pub strong: f64,
    pub fast: f64,
}

impl AttackValues {
    pub fn get(&self, attack: AttackType) -> f64 {
        match attack {
            AttackType::Mental => self.mental,
            AttackType::Strong => self.strong,
            AttackType::Fast => self.fast,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttackType, f64)> + '_ {
        AttackType::ALL.into_iter().map(move |attack| (attack, self.get(attack)))
    }
}

/// Attribute weights feeding an attack type; each triple sums to 1.0
pub fn attack_weights(attack: AttackType) -> [(Attribute, f64); 3] {
    match attack {
        AttackType::Mental => [
            (Attribute::Intelligence, 0.7),
            (Attribute::Speed, 0.2),
            (Attribute::Combat, 0.1),
        ],
        AttackType::Strong => [
            (Attribute::Strength, 0.6),
            (Attribute::Power, 0.2),
            (Attribute::Combat, 0.2),
        ],
        AttackType::Fast => [
            (Attribute::Speed, 0.55),
            (Attribute::Durability, 0.25),
            (Attribute::Strength, 0.2),
        ],
    }
}

/// Draw an actual stamina value in 0..=10
pub fn roll_stamina<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(0..=MAX_STAMINA)
}

/// Draw a filiation roll in 0..=9
pub fn roll_filiation<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(0..=MAX_FILIATION_ROLL)
}

/// Filiation coefficient: amplifies a character sharing the team's alignment,
/// dampens one that does not.
pub fn filiation(character_alignment: &str, team_alignment: &str, roll: u8) -> f64 {
    let roll = f64::from(roll.min(MAX_FILIATION_ROLL));
    if character_alignment == team_alignment {
        1.0 + roll
    } else {
        1.0 / (1.0 + roll)
    }
}

/// `((2 * base + AS) / 1.1) * FB` for every attribute
pub fn derive_stats(base: &AttributeSet, stamina: u8, fb: f64) -> AttributeSet {
    let stamina = f64::from(stamina);
    base.map(|value| (2.0 * value + stamina) / 1.1 * fb)
}

/// Full hit points; only strength, durability and power contribute
pub fn derive_hit_points(stats: &AttributeSet, stamina: u8) -> f64 {
    let weighted = stats.strength * 0.8 + stats.durability * 0.7 + stats.power;
    weighted / 2.0 * (1.0 + f64::from(stamina) / 10.0) + HP_FLOOR
}

/// Weighted attribute sum per attack type, scaled by FB
pub fn derive_attacks(stats: &AttributeSet, fb: f64) -> AttackValues {
    let value = |attack| {
        attack_weights(attack)
            .iter()
            .map(|&(attr, weight)| stats.get(attr) * weight)
            .sum::<f64>()
            * fb
    };
    AttackValues {
        mental: value(AttackType::Mental),
        strong: value(AttackType::Strong),
        fast: value(AttackType::Fast),
    }
}
