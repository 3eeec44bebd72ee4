//! Append-only battle log sink
//!
//! Entries must arrive in order: the team announcement, then rounds, then
//! exactly one winner. Each entry is mirrored to the log file (if any) as
//! soon as it is recorded.

use crate::battle_log::codec;
use crate::battle_log::record::{BattleRecord, RoundEvent};
use crate::core::config::TEAM_SEPARATOR;
use crate::core::error::LogError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Default)]
pub struct BattleLog {
    teams: Option<[String; 2]>,
    rounds: Vec<RoundEvent>,
    winner: Option<String>,
    file: Option<BufWriter<File>>,
}

impl BattleLog {
    /// A log kept only in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A log mirrored to `path`; any previous content is discarded
    pub fn create(path: &Path) -> Result<Self, LogError> {
        let file = File::create(path)?;
        Ok(Self {
            file: Some(BufWriter::new(file)),
            ..Self::default()
        })
    }

    pub fn announce_teams(&mut self, first: &str, second: &str) -> Result<(), LogError> {
        if self.teams.is_some() {
            return Err(LogError::OutOfOrder("teams already announced"));
        }
        codec::check_team_names(first, second).map_err(|reason| LogError::UnloggableName {
            role: "team",
            name: format!("{}{}{}", first, TEAM_SEPARATOR, second),
            reason,
        })?;
        self.write_line(&codec::encode_teams(first, second))?;
        self.teams = Some([first.to_string(), second.to_string()]);
        Ok(())
    }

    pub fn record_round(&mut self, event: RoundEvent) -> Result<(), LogError> {
        if self.teams.is_none() {
            return Err(LogError::OutOfOrder("round recorded before teams were announced"));
        }
        if self.winner.is_some() {
            return Err(LogError::OutOfOrder("round recorded after the winner"));
        }
        for name in [&event.attacker.name, &event.defender.name, &event.winner] {
            codec::check_character_name(name).map_err(|reason| LogError::UnloggableName {
                role: "character",
                name: name.clone(),
                reason,
            })?;
        }
        self.write_line(&codec::encode_round(&event))?;
        self.rounds.push(event);
        Ok(())
    }

    pub fn declare_winner(&mut self, team: &str) -> Result<(), LogError> {
        if self.teams.is_none() {
            return Err(LogError::OutOfOrder("winner declared before teams were announced"));
        }
        if self.winner.is_some() {
            return Err(LogError::OutOfOrder("winner already declared"));
        }
        if !self.teams.iter().flatten().any(|name| name == team) {
            return Err(LogError::UnloggableName {
                role: "winning team",
                name: team.to_string(),
                reason: "not one of the announced teams",
            });
        }
        self.write_line(&codec::encode_winner(team))?;
        self.winner = Some(team.to_string());
        Ok(())
    }

    /// The complete record, once the winner has been declared
    pub fn record(&self) -> Option<BattleRecord> {
        match (&self.teams, &self.winner) {
            (Some(teams), Some(winner)) => Some(BattleRecord {
                teams: teams.clone(),
                rounds: self.rounds.clone(),
                winner: winner.clone(),
            }),
            _ => None,
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), LogError> {
        if let Some(writer) = self.file.as_mut() {
            writeln!(writer, "{}", line)?;
            writer.flush()?;
        }
        Ok(())
    }
}

/// Read a battle log file back into a record
pub fn read_record(path: &Path) -> crate::core::error::Result<BattleRecord> {
    let text = std::fs::read_to_string(path)?;
    Ok(codec::decode(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle_log::record::RoundParticipant;

    fn event(round: u32) -> RoundEvent {
        RoundEvent {
            round,
            attacker: RoundParticipant::new("Storm", 250.0),
            defender: RoundParticipant::new("Magneto", 310.555),
            winner: "Storm".into(),
        }
    }

    #[test]
    fn test_in_memory_record() {
        let mut log = BattleLog::in_memory();
        log.announce_teams("TEAM 1", "TEAM 2").unwrap();
        log.record_round(event(1)).unwrap();
        assert!(log.record().is_none());
        log.declare_winner("TEAM 1").unwrap();

        let record = log.record().unwrap();
        assert_eq!(record.rounds.len(), 1);
        assert_eq!(record.winner, "TEAM 1");
    }

    #[test]
    fn test_out_of_order_entries_are_rejected() {
        let mut log = BattleLog::in_memory();
        assert!(matches!(log.record_round(event(1)), Err(LogError::OutOfOrder(_))));
        assert!(matches!(log.declare_winner("TEAM 1"), Err(LogError::OutOfOrder(_))));

        log.announce_teams("TEAM 1", "TEAM 2").unwrap();
        assert!(log.announce_teams("TEAM 1", "TEAM 2").is_err());
        log.declare_winner("TEAM 2").unwrap();
        assert!(log.record_round(event(1)).is_err());
        assert!(log.declare_winner("TEAM 2").is_err());
    }

    #[test]
    fn test_names_that_break_the_log_are_rejected() {
        let mut log = BattleLog::in_memory();
        assert!(matches!(
            log.announce_teams("RED v/s GREEN", "BLUE"),
            Err(LogError::UnloggableName { role: "team", .. })
        ));
        log.announce_teams("TEAM 1", "TEAM 2").unwrap();

        let mut bad = event(1);
        bad.defender.name = "Mag\nneto".into();
        assert!(matches!(
            log.record_round(bad),
            Err(LogError::UnloggableName { role: "character", .. })
        ));

        let mut bad = event(1);
        bad.attacker.name = "Storm (HP: 1.00)".into();
        bad.winner = bad.attacker.name.clone();
        assert!(log.record_round(bad).is_err());

        let mut bad = event(1);
        bad.attacker.name = String::new();
        assert!(log.record_round(bad).is_err());

        // Rejected rounds leave no trace
        log.record_round(event(1)).unwrap();
        assert!(log.declare_winner("TEAM 3").is_err());
        log.declare_winner("TEAM 1").unwrap();
        assert_eq!(log.record().unwrap().rounds, vec![event(1)]);
    }

    #[test]
    fn test_file_is_overwritten_and_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("battle_log.txt");
        std::fs::write(&path, "stale content from an earlier run\n").unwrap();

        let mut log = BattleLog::create(&path).unwrap();
        log.announce_teams("TEAM 1", "TEAM 2").unwrap();
        log.record_round(event(1)).unwrap();
        log.record_round(event(2)).unwrap();
        log.declare_winner("TEAM 1").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert_eq!(text.lines().count(), 4);

        let record = read_record(&path).unwrap();
        assert_eq!(Some(record), log.record());
    }
}
