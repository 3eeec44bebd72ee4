//! Team assembly from a character source
//!
//! Draw ids at random, skip ids any team already holds, fetch each accepted
//! id with a bounded retry loop, and derive the finished team once its
//! alignment is known. Any fetch that exhausts its attempts abandons the
//! whole assembly.

use crate::battle_log::codec::loggable_character_name;
use crate::character::Recruit;
use crate::core::config::{RosterConfig, TEAM_SIZE};
use crate::core::error::{AssemblyError, FetchError};
use crate::core::types::CharacterId;
use crate::roster::registry::IdRegistry;
use crate::roster::team::Team;
use crate::source::{CharacterRecord, CharacterSource, IdSpace};
use rand::Rng;
use tracing::{debug, info, warn};

/// Fills teams with unique characters from a source
pub struct RosterBuilder<'a, S> {
    source: &'a S,
    config: RosterConfig,
    team_size: usize,
}

impl<'a, S: CharacterSource> RosterBuilder<'a, S> {
    pub fn new(source: &'a S, config: &RosterConfig) -> Self {
        Self {
            source,
            config: config.clone(),
            team_size: TEAM_SIZE,
        }
    }

    /// Assemble one team, claiming its member ids in `registry`
    pub async fn assemble<R: Rng + ?Sized>(
        &self,
        name: &str,
        registry: &mut IdRegistry,
        rng: &mut R,
    ) -> Result<Team, AssemblyError> {
        let mut recruits: Vec<Recruit> = Vec::with_capacity(self.team_size);
        let space = self.source.id_space(self.config.max_character_id);

        while recruits.len() < self.team_size {
            let id = self.draw_unclaimed_id(&space, registry, rng)?;
            let record = self.fetch_with_retry(id).await?;
            if record.id != id {
                warn!(requested = %id, returned = %record.id, "Source answered with another id");
            }

            let hero = match loggable_character_name(&record.name) {
                Some(hero) if hero == record.name => hero,
                Some(hero) => {
                    warn!(character = %id, original = ?record.name, hero = %hero, "Character name rewritten for the battle log");
                    hero
                }
                None => {
                    let hero = format!("Character {}", id);
                    warn!(character = %id, hero = %hero, "Character has no usable name");
                    hero
                }
            };

            registry.claim(id);
            info!(team = name, character = %id, hero = %hero, "Character joined team");
            recruits.push(Recruit::new(
                id,
                hero,
                record.alignment,
                record.base,
                &mut *rng,
            ));
        }

        let team = Team::from_recruits(name.to_string(), recruits, rng);
        info!(team = name, alignment = %team.alignment, "Team assembled");
        Ok(team)
    }

    /// Draw ids from `space` until one is not held by any team
    fn draw_unclaimed_id<R: Rng + ?Sized>(
        &self,
        space: &IdSpace,
        registry: &IdRegistry,
        rng: &mut R,
    ) -> Result<CharacterId, AssemblyError> {
        match space {
            IdSpace::Contiguous(max) => {
                let available = *max as usize;
                if registry.len() >= available {
                    return Err(AssemblyError::IdSpaceExhausted {
                        available,
                        needed: registry.len() + 1,
                    });
                }

                loop {
                    let id = CharacterId(rng.gen_range(1..=*max));
                    if !registry.contains(id) {
                        return Ok(id);
                    }
                    debug!(character = %id, "Character already on a team, drawing again");
                }
            }
            IdSpace::Listed(ids) => {
                let open: Vec<CharacterId> =
                    ids.iter().copied().filter(|id| !registry.contains(*id)).collect();
                if open.is_empty() {
                    return Err(AssemblyError::IdSpaceExhausted {
                        available: ids.len(),
                        needed: registry.len() + 1,
                    });
                }
                Ok(open[rng.gen_range(0..open.len())])
            }
        }
    }

    /// Fetch one id, retrying the same id after a fixed delay
    async fn fetch_with_retry(&self, id: CharacterId) -> Result<CharacterRecord, AssemblyError> {
        let attempts = self.config.fetch_attempts.max(1);
        let mut last_error: Option<FetchError> = None;

        for attempt in 1..=attempts {
            match self.source.fetch(id).await {
                Ok(record) => return Ok(record),
                Err(err) => {
                    warn!(character = %id, attempt, attempts, error = %err, "Fetch failed");
                    last_error = Some(err);
                    if attempt < attempts {
                        tokio::time::sleep(self.config.retry_delay()).await;
                    }
                }
            }
        }

        Err(AssemblyError::FetchExhausted {
            id,
            attempts,
            source: last_error.unwrap_or(FetchError::NotFound(id)),
        })
    }
}
