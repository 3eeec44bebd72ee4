//! Character attribute sources
//!
//! The roster builder only sees the `CharacterSource` trait. Two
//! implementations ship with the crate: the remote Superhero API client and
//! an in-memory source used for offline play and tests.

pub mod memory;
pub mod superhero_api;

use crate::character::AttributeSet;
use crate::core::error::FetchError;
use crate::core::types::CharacterId;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub use memory::InMemorySource;
pub use superhero_api::SuperheroApiClient;

/// Raw data for one character as reported by a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: CharacterId,
    pub name: String,
    pub alignment: String,
    /// Missing attributes are already coerced to zero
    pub base: AttributeSet,
}

/// Ids a source can serve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdSpace {
    /// Every id in `1..=max`
    Contiguous(u32),
    /// Exactly these ids, ascending
    Listed(Vec<CharacterId>),
}

impl IdSpace {
    pub fn len(&self) -> usize {
        match self {
            IdSpace::Contiguous(max) => *max as usize,
            IdSpace::Listed(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Anything that can look up a character's attributes by id
pub trait CharacterSource {
    /// Fetch one record. A single call is a single attempt; retrying is the
    /// caller's business.
    fn fetch(
        &self,
        id: CharacterId,
    ) -> impl Future<Output = Result<CharacterRecord, FetchError>> + Send;

    /// Ids worth drawing, given the configured upper bound
    fn id_space(&self, max_character_id: u32) -> IdSpace {
        IdSpace::Contiguous(max_character_id)
    }
}
