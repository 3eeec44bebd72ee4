//! Human-oriented battle output
//!
//! Everything here goes to the console only. The battle log file never
//! sees these lines.

use crate::character::Character;
use crate::core::types::{AttackType, Attribute};
use crate::duel::{BattleOutcome, Move, RoundSummary};
use crate::roster::Team;
use std::io::{self, Write};

pub fn write_intro<W: Write>(out: &mut W, first: &Team, second: &Team) -> io::Result<()> {
    writeln!(out, "==============================")?;
    writeln!(out, "  SUPERHERO BATTLE")?;
    writeln!(out, "  {} v/s {}", first.name, second.name)?;
    writeln!(out, "==============================")?;
    writeln!(out)
}

/// Roster table with every derived value of every member
pub fn write_team<W: Write>(out: &mut W, team: &Team) -> io::Result<()> {
    writeln!(out, "{} (alignment: {})", team.name, team.alignment)?;
    write!(
        out,
        "  {:>4}  {:<24} {:<8} {:>2} {:>5} {:>8}",
        "ID", "NAME", "ALIGN", "AS", "FB", "HP"
    )?;
    for attr in Attribute::ALL {
        write!(out, " {:>7}", abbreviate(attr.name()))?;
    }
    for attack in AttackType::ALL {
        write!(out, " {:>8}", attack.name())?;
    }
    writeln!(out)?;

    for member in team.members() {
        write_member(out, member)?;
    }
    writeln!(out)
}

fn write_member<W: Write>(out: &mut W, c: &Character) -> io::Result<()> {
    write!(
        out,
        "  {:>4}  {:<24} {:<8} {:>2} {:>5.2} {:>8.2}",
        c.id.0,
        truncate(&c.name, 24),
        c.alignment,
        c.stamina,
        c.filiation,
        c.hit_points
    )?;
    for (_, value) in c.stats.iter() {
        write!(out, " {:>7.2}", value)?;
    }
    for (_, value) in c.attacks.iter() {
        write!(out, " {:>8.2}", value)?;
    }
    writeln!(out)
}

pub fn write_round<W: Write>(out: &mut W, summary: &RoundSummary, show_moves: bool) -> io::Result<()> {
    let event = &summary.event;
    writeln!(
        out,
        "--- Round {}: {} (HP: {}) v/s {} (HP: {}) ---",
        event.round, event.attacker.name, event.attacker.hp, event.defender.name, event.defender.hp
    )?;
    if show_moves {
        for step in &summary.moves {
            write_move(out, step)?;
        }
    }
    writeln!(
        out,
        "    {} wins the round, {} is out",
        event.winner, summary.defeated.name
    )
}

pub fn write_move<W: Write>(out: &mut W, step: &Move) -> io::Result<()> {
    writeln!(
        out,
        "    Move {}: {} uses a {} attack on {} for {:.2} damage ({:.2} HP left)",
        step.number, step.attacker, step.attack, step.defender, step.damage, step.defender_hp
    )
}

pub fn write_winner<W: Write>(out: &mut W, outcome: &BattleOutcome) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "==============================")?;
    writeln!(
        out,
        "  WINNER: {} after {} rounds ({} moves)",
        outcome.winning_team,
        outcome.rounds.len(),
        outcome.total_moves()
    )?;
    writeln!(out, "==============================")
}

/// Print a whole battle
pub fn write_battle<W: Write>(out: &mut W, outcome: &BattleOutcome, show_moves: bool) -> io::Result<()> {
    for summary in &outcome.rounds {
        write_round(out, summary, show_moves)?;
    }
    write_winner(out, outcome)
}

fn abbreviate(name: &str) -> &str {
    name.get(..3).unwrap_or(name)
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        name.chars().take(width - 1).chain(std::iter::once('~')).collect()
    }
}
