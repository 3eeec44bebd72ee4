//! Superhero Battle - team-vs-team battle simulator

pub mod battle_log;
pub mod character;
pub mod core;
pub mod duel;
pub mod report;
pub mod roster;
pub mod simulation;
pub mod source;
