//! Team assembly
//!
//! Teams are drawn from a `CharacterSource` with ids that are unique across
//! every team of the same battle run.

pub mod builder;
pub mod registry;
pub mod team;

pub use builder::RosterBuilder;
pub use registry::IdRegistry;
pub use team::{dominant_alignment, Team};
