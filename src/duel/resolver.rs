//! Round-by-round duel state machine
//!
//! ```text
//! RoundStart --(both teams have members)--> Exchange
//! RoundStart --(a team is empty)---------> BattleEnd
//! Exchange   --(defender HP < 0)---------> RoundEnd
//! Exchange   --(defender stands)---------> Exchange (roles swapped)
//! RoundEnd   --------------------------->  RoundStart
//! ```
//!
//! Both combatants leave their teams while a round runs. At round end the
//! loser is dropped and the winner goes back to its slot with full hit
//! points.

use crate::battle_log::{BattleLog, BattleRecord, RoundEvent, RoundParticipant};
use crate::character::Character;
use crate::core::error::BattleError;
use crate::core::types::Side;
use crate::duel::{BattleOutcome, Move, RoundSummary};
use crate::roster::Team;
use rand::Rng;
use tracing::{debug, info};

/// Runs a battle between two assembled teams
pub struct DuelResolver<R> {
    teams: [Team; 2],
    rng: R,
    rounds_fought: u32,
}

enum Phase {
    RoundStart,
    Exchange(Duel),
    RoundEnd(Duel),
    BattleEnd,
}

struct Fighter {
    side: Side,
    slot: usize,
    character: Character,
}

struct Duel {
    round: u32,
    attacker: Fighter,
    defender: Fighter,
    /// Team-one combatant, then team-two combatant, as the round began
    opening: [RoundParticipant; 2],
    moves: Vec<Move>,
}

impl Duel {
    fn swap_roles(&mut self) {
        std::mem::swap(&mut self.attacker, &mut self.defender);
    }
}

impl<R: Rng> DuelResolver<R> {
    pub fn new(first: Team, second: Team, rng: R) -> Self {
        Self {
            teams: [first, second],
            rng,
            rounds_fought: 0,
        }
    }

    pub fn teams(&self) -> &[Team; 2] {
        &self.teams
    }

    pub fn team(&self, side: Side) -> &Team {
        &self.teams[side.index()]
    }

    /// Fight rounds until one team is eliminated, logging every entry
    pub fn run(&mut self, log: &mut BattleLog) -> Result<BattleOutcome, BattleError> {
        if let Some(empty) = self.teams.iter().find(|team| !team.has_members()) {
            return Err(BattleError::EmptyTeam(empty.name.clone()));
        }

        let team_names = [self.teams[0].name.clone(), self.teams[1].name.clone()];
        log.announce_teams(&team_names[0], &team_names[1])?;

        let mut rounds: Vec<RoundSummary> = Vec::new();
        let mut phase = Phase::RoundStart;
        loop {
            phase = match phase {
                Phase::RoundStart => self.open_round()?,
                Phase::Exchange(duel) => self.exchange(duel),
                Phase::RoundEnd(duel) => {
                    let summary = self.close_round(duel);
                    log.record_round(summary.event.clone())?;
                    rounds.push(summary);
                    if self.teams.iter().all(Team::has_members) {
                        Phase::RoundStart
                    } else {
                        Phase::BattleEnd
                    }
                }
                Phase::BattleEnd => break,
            };
        }

        // Rounds only end on a defeat, so exactly one team has members left
        let winner = if self.teams[0].has_members() {
            Side::First
        } else {
            Side::Second
        };
        let winning_team = team_names[winner.index()].clone();
        log.declare_winner(&winning_team)?;
        info!(team = %winning_team, rounds = rounds.len(), "Battle won");

        let record = BattleRecord {
            teams: team_names,
            rounds: rounds.iter().map(|r| r.event.clone()).collect(),
            winner: winning_team.clone(),
        };

        Ok(BattleOutcome {
            winner,
            winning_team,
            rounds,
            record,
        })
    }

    /// Pick a random member of each team; team one attacks first
    fn open_round(&mut self) -> Result<Phase, BattleError> {
        if !self.teams.iter().all(Team::has_members) {
            return Ok(Phase::BattleEnd);
        }
        let Some(attacker) = self.draw_fighter(Side::First) else {
            return Ok(Phase::BattleEnd);
        };
        let Some(defender) = self.draw_fighter(Side::Second) else {
            self.return_fighter(attacker);
            return Ok(Phase::BattleEnd);
        };

        self.rounds_fought += 1;
        let round = self.rounds_fought;

        if max_damage(&attacker.character) <= 0.0 && max_damage(&defender.character) <= 0.0 {
            let err = BattleError::Stalemate {
                round,
                attacker: attacker.character.name.clone(),
                defender: defender.character.name.clone(),
            };
            self.return_fighter(attacker);
            self.return_fighter(defender);
            return Err(err);
        }

        let opening = [
            RoundParticipant::new(attacker.character.name.clone(), attacker.character.hit_points),
            RoundParticipant::new(defender.character.name.clone(), defender.character.hit_points),
        ];
        info!(
            round,
            attacker = %opening[0].name,
            attacker_hp = %opening[0].hp,
            defender = %opening[1].name,
            defender_hp = %opening[1].hp,
            "Round started"
        );

        Ok(Phase::Exchange(Duel {
            round,
            attacker,
            defender,
            opening,
            moves: Vec::new(),
        }))
    }

    /// One attack; the round ends as soon as the defender drops below zero
    fn exchange(&mut self, mut duel: Duel) -> Phase {
        let strike = duel
            .attacker
            .character
            .attack(&mut duel.defender.character, &mut self.rng);

        let step = Move {
            number: duel.moves.len() as u32 + 1,
            attacker: duel.attacker.character.name.clone(),
            defender: duel.defender.character.name.clone(),
            attack: strike.attack,
            damage: strike.damage,
            defender_hp: duel.defender.character.hit_points,
        };
        debug!(
            round = duel.round,
            step = step.number,
            attacker = %step.attacker,
            defender = %step.defender,
            attack = %step.attack,
            damage = step.damage,
            remaining = step.defender_hp,
            "Exchange"
        );
        duel.moves.push(step);

        if duel.defender.character.is_defeated() {
            Phase::RoundEnd(duel)
        } else {
            duel.swap_roles();
            Phase::Exchange(duel)
        }
    }

    /// Drop the loser, restore the winner and produce the round's log entry
    fn close_round(&mut self, duel: Duel) -> RoundSummary {
        let Duel {
            round,
            attacker: mut winner,
            defender: loser,
            opening,
            moves,
        } = duel;

        winner.character.reset_hit_points();
        let winner_name = winner.character.name.clone();
        let winner_side = winner.side;
        info!(round, winner = %winner_name, defeated = %loser.character.name, "Round finished");

        self.return_fighter(winner);

        let [first, second] = opening;
        RoundSummary {
            event: RoundEvent {
                round,
                attacker: first,
                defender: second,
                winner: winner_name,
            },
            winner_side,
            defeated: loser.character,
            moves,
        }
    }

    fn draw_fighter(&mut self, side: Side) -> Option<Fighter> {
        let team = &mut self.teams[side.index()];
        let slot = team.select_random(&mut self.rng)?;
        let character = team.take_member(slot)?;
        Some(Fighter {
            side,
            slot,
            character,
        })
    }

    fn return_fighter(&mut self, fighter: Fighter) {
        self.teams[fighter.side.index()].return_member(fighter.slot, fighter.character);
    }
}

fn max_damage(character: &Character) -> f64 {
    character
        .attacks
        .iter()
        .map(|(_, damage)| damage)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{AttributeSet, Recruit};
    use crate::core::types::CharacterId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fighter(id: u32, base: f64, stamina: u8) -> Character {
        Recruit::with_stamina(
            CharacterId(id),
            format!("Hero {}", id),
            "good".into(),
            AttributeSet::uniform(base),
            stamina,
        )
        .derive_with_roll("good", 0)
    }

    fn team(name: &str, members: Vec<Character>) -> Team {
        Team::from_members(name.into(), "good".into(), members)
    }

    #[test]
    fn test_battle_ends_with_one_team_standing() {
        let first = team("TEAM 1", (1..=5).map(|id| fighter(id, 40.0, 5)).collect());
        let second = team("TEAM 2", (6..=10).map(|id| fighter(id, 40.0, 5)).collect());
        let mut resolver = DuelResolver::new(first, second, ChaCha8Rng::seed_from_u64(21));
        let mut log = BattleLog::in_memory();

        let outcome = resolver.run(&mut log).unwrap();
        let [first, second] = resolver.teams();

        assert_ne!(first.has_members(), second.has_members());
        assert_eq!(resolver.team(outcome.winner).name, outcome.winning_team);
        assert!(resolver.team(outcome.winner.opponent()).is_empty());
        // Each round removes exactly one character
        let survivors = first.len() + second.len();
        assert_eq!(outcome.rounds.len(), 10 - survivors);
        assert_eq!(log.record(), Some(outcome.record.clone()));
    }

    #[test]
    fn test_round_numbers_are_sequential() {
        let first = team("A", (1..=5).map(|id| fighter(id, 30.0, 2)).collect());
        let second = team("B", (6..=10).map(|id| fighter(id, 30.0, 8)).collect());
        let mut resolver = DuelResolver::new(first, second, ChaCha8Rng::seed_from_u64(4));
        let outcome = resolver.run(&mut BattleLog::in_memory()).unwrap();

        for (i, summary) in outcome.rounds.iter().enumerate() {
            assert_eq!(summary.event.round, i as u32 + 1);
        }
    }

    #[test]
    fn test_round_winner_returns_with_full_hit_points() {
        let first = team("A", (1..=5).map(|id| fighter(id, 60.0, 6)).collect());
        let second = team("B", (6..=10).map(|id| fighter(id, 20.0, 1)).collect());
        let mut resolver = DuelResolver::new(first, second, ChaCha8Rng::seed_from_u64(8));
        resolver.run(&mut BattleLog::in_memory()).unwrap();

        for team in resolver.teams() {
            for member in team.members() {
                assert_eq!(member.hit_points, member.full_hit_points());
            }
        }
    }

    #[test]
    fn test_single_blow_ends_round() {
        let mut attacker = fighter(1, 10.0, 0);
        attacker.attacks.mental = 15.0;
        attacker.attacks.strong = 15.0;
        attacker.attacks.fast = 15.0;
        let mut defender = fighter(2, 0.0, 0);
        defender.hit_points = 10.0;

        let mut resolver = DuelResolver::new(
            team("A", vec![attacker]),
            team("B", vec![defender]),
            ChaCha8Rng::seed_from_u64(1),
        );
        let outcome = resolver.run(&mut BattleLog::in_memory()).unwrap();

        assert_eq!(outcome.winner, Side::First);
        let round = &outcome.rounds[0];
        assert_eq!(round.moves.len(), 1);
        assert_eq!(round.moves[0].defender_hp, -5.0);
        assert_eq!(round.event.defender.hp.as_str(), "10.00");
        assert_eq!(round.event.winner, "Hero 1");
        assert_eq!(round.defeated.id, CharacterId(2));
    }

    #[test]
    fn test_counterattack_can_win_round() {
        let mut weak = fighter(1, 0.0, 0);
        weak.attacks.mental = 1.0;
        weak.attacks.strong = 1.0;
        weak.attacks.fast = 1.0;
        let mut strong = fighter(2, 0.0, 0);
        strong.attacks.mental = 500.0;
        strong.attacks.strong = 500.0;
        strong.attacks.fast = 500.0;

        let mut resolver = DuelResolver::new(
            team("A", vec![weak]),
            team("B", vec![strong]),
            ChaCha8Rng::seed_from_u64(2),
        );
        let outcome = resolver.run(&mut BattleLog::in_memory()).unwrap();

        assert_eq!(outcome.winner, Side::Second);
        let round = &outcome.rounds[0];
        assert_eq!(round.moves.len(), 2);
        assert_eq!(round.moves[0].attacker, "Hero 1");
        assert_eq!(round.moves[1].attacker, "Hero 2");
        // The log keeps team one's combatant in the attacker column
        assert_eq!(round.event.attacker.name, "Hero 1");
        assert_eq!(round.event.winner, "Hero 2");
    }

    #[test]
    fn test_harmless_pair_is_a_stalemate() {
        let mut resolver = DuelResolver::new(
            team("A", vec![fighter(1, 0.0, 0)]),
            team("B", vec![fighter(2, 0.0, 0)]),
            ChaCha8Rng::seed_from_u64(3),
        );
        let err = resolver.run(&mut BattleLog::in_memory()).unwrap_err();
        assert!(matches!(err, BattleError::Stalemate { round: 1, .. }));
        // Nobody is lost when the round cannot be fought
        assert_eq!(resolver.team(Side::First).len(), 1);
        assert_eq!(resolver.team(Side::Second).len(), 1);
    }

    #[test]
    fn test_empty_team_cannot_fight() {
        let mut resolver = DuelResolver::new(
            team("A", vec![fighter(1, 10.0, 1)]),
            team("B", Vec::new()),
            ChaCha8Rng::seed_from_u64(3),
        );
        assert!(matches!(
            resolver.run(&mut BattleLog::in_memory()),
            Err(BattleError::EmptyTeam(name)) if name == "B"
        ));
    }
}
