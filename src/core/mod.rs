pub mod config;
pub mod error;
pub mod types;

pub use config::{BattleConfig, TEAM_SIZE};
pub use error::{BattleError, Result};
pub use types::{AttackType, Attribute, BattleRunId, CharacterId, Side};
