//! Per-battle registry of character ids already placed on a team

use crate::core::types::CharacterId;
use ahash::AHashSet;

/// Ids claimed by any team in one battle run.
///
/// Owned by the battle run; a fresh registry starts every simulation so
/// unrelated battles never see each other's members.
#[derive(Debug, Default, Clone)]
pub struct IdRegistry {
    claimed: AHashSet<CharacterId>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.claimed.contains(&id)
    }

    /// Claim an id; returns false when another member already holds it
    pub fn claim(&mut self, id: CharacterId) -> bool {
        self.claimed.insert(id)
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
