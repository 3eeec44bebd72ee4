//! One battle run: assemble two teams, fight, record
//!
//! Every run gets its own id registry, so two runs never influence each
//! other's rosters. All tracing output of a run is grouped under a span
//! carrying its `BattleRunId`.

use crate::battle_log::BattleLog;
use crate::core::config::BattleConfig;
use crate::core::error::Result;
use crate::core::types::BattleRunId;
use crate::duel::{BattleOutcome, DuelResolver};
use crate::roster::{IdRegistry, RosterBuilder, Team};
use crate::source::CharacterSource;
use rand::Rng;
use tracing::{info, info_span, Instrument, Span};

pub struct BattleRun<'a, S> {
    id: BattleRunId,
    source: &'a S,
    config: &'a BattleConfig,
    span: Span,
}

impl<'a, S: CharacterSource> BattleRun<'a, S> {
    pub fn new(source: &'a S, config: &'a BattleConfig) -> Self {
        let id = BattleRunId::new();
        Self {
            id,
            source,
            config,
            span: info_span!("battle", run = %id),
        }
    }

    pub fn id(&self) -> BattleRunId {
        self.id
    }

    /// Draw both teams from a fresh registry; ids never repeat across teams
    pub async fn assemble_teams<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<[Team; 2]> {
        async {
            let builder = RosterBuilder::new(self.source, &self.config.roster);
            let mut registry = IdRegistry::new();
            let [first_name, second_name] = &self.config.team_names;

            let first = builder.assemble(first_name, &mut registry, rng).await?;
            let second = builder.assemble(second_name, &mut registry, rng).await?;
            Ok([first, second])
        }
        .instrument(self.span.clone())
        .await
    }

    /// Resolve the battle, writing every entry to `log`
    pub fn fight<R: Rng>(&self, teams: [Team; 2], rng: R, log: &mut BattleLog) -> Result<BattleOutcome> {
        let _guard = self.span.enter();
        let [first, second] = teams;
        info!(first = %first.name, second = %second.name, "Battle started");
        let mut resolver = DuelResolver::new(first, second, rng);
        resolver.run(log)
    }

    /// Assemble and fight in one go
    pub async fn run<R: Rng>(&self, rng: &mut R, log: &mut BattleLog) -> Result<BattleOutcome> {
        let teams = self.assemble_teams(rng).await?;
        self.fight(teams, rng, log)
    }
}
