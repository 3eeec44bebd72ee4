//! Battle log: the only durable artifact of a battle
//!
//! The log is written while the battle runs and read back afterwards to
//! build the report, independent of the live simulation objects.

pub mod codec;
pub mod record;
pub mod sink;

pub use codec::{decode, encode};
pub use record::{BattleRecord, HpReading, RoundEvent, RoundParticipant};
pub use sink::{read_record, BattleLog};
