//! Text encoding of the battle log
//!
//! Line templates:
//!
//! ```text
//! TEAM 1 v/s TEAM 2
//! ROUND 1 - Batman (HP: 412.73) v/s Joker (HP: 230.10) - WINNER: Batman
//! WINNER: TEAM 1
//! ```
//!
//! `decode` accepts exactly one team line, any number of round lines and
//! one winner line. Any other line (blank lines included) is rejected, so
//! human-oriented output must never be written to the same file.
//!
//! Character names must not contain `" (HP: "` and the first team name
//! must not contain `" v/s "`; such names cannot be told apart from the
//! template's own separators. No name may be blank or span lines. The
//! `check_*` functions enforce this before a line is written.

use crate::battle_log::record::{BattleRecord, HpReading, RoundEvent, RoundParticipant};
use crate::core::config::TEAM_SEPARATOR;
use crate::core::error::DecodeError;
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::{char, digit1};
use nom::combinator::{map_res, opt, recognize, rest};
use nom::sequence::{delimited, preceded, separated_pair};
use nom::{IResult, Parser};

const ROUND_PREFIX: &str = "ROUND ";
const HP_OPEN: &str = " (HP: ";
const ROUND_WINNER: &str = " - WINNER: ";
const BATTLE_WINNER: &str = "WINNER: ";

pub fn encode_teams(first: &str, second: &str) -> String {
    format!("{}{}{}", first, TEAM_SEPARATOR, second)
}

pub fn encode_round(event: &RoundEvent) -> String {
    format!(
        "ROUND {} - {} (HP: {}) v/s {} (HP: {}) - WINNER: {}",
        event.round,
        event.attacker.name,
        event.attacker.hp,
        event.defender.name,
        event.defender.hp,
        event.winner
    )
}

pub fn encode_winner(team: &str) -> String {
    format!("{}{}", BATTLE_WINNER, team)
}

/// Render a whole record, one line per entry
pub fn encode(record: &BattleRecord) -> String {
    let [first, second] = &record.teams;
    let mut out = encode_teams(first, second);
    out.push('\n');
    for event in &record.rounds {
        out.push_str(&encode_round(event));
        out.push('\n');
    }
    out.push_str(&encode_winner(&record.winner));
    out.push('\n');
    out
}

/// Problem with a name in any log slot, if it has one
fn line_safety(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        Err("name is blank")
    } else if name.contains(['\n', '\r']) {
        Err("name spans more than one line")
    } else {
        Ok(())
    }
}

/// Check a character name before it goes into a round line
pub fn check_character_name(name: &str) -> Result<(), &'static str> {
    line_safety(name)?;
    if name.contains(HP_OPEN) {
        return Err("name contains the hit point marker");
    }
    Ok(())
}

/// Check both team names before they go into the announcement line
pub fn check_team_names(first: &str, second: &str) -> Result<(), &'static str> {
    line_safety(first)?;
    line_safety(second)?;
    if first.contains(TEAM_SEPARATOR) {
        return Err("first team name contains the team separator");
    }
    Ok(())
}

/// Rewrite a character name so it passes `check_character_name`.
///
/// Line breaks become spaces and the hit point marker loses its colon.
/// Returns `None` when nothing printable is left.
pub fn loggable_character_name(name: &str) -> Option<String> {
    let mut cleaned = name.replace(['\n', '\r'], " ");
    while cleaned.contains(HP_OPEN) {
        cleaned = cleaned.replace(HP_OPEN, " (HP ");
    }
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Rebuild a record from battle log text
pub fn decode(text: &str) -> Result<BattleRecord, DecodeError> {
    if text.trim().is_empty() {
        return Err(DecodeError::Empty);
    }

    let lines: Vec<&str> = text.lines().collect();
    let (first, remainder) = lines.split_first().ok_or(DecodeError::Empty)?;
    let (last, middle) = remainder
        .split_last()
        .ok_or(DecodeError::MissingLine("winner announcement"))?;

    let teams = parse_line(teams_line, first, 1, "team announcement")?;

    let mut rounds = Vec::with_capacity(middle.len());
    for (offset, line) in middle.iter().enumerate() {
        let number = offset + 2;
        let event = parse_line(round_line, line, number, "round result")?;
        let expected = offset as u32 + 1;
        if event.round != expected {
            return Err(DecodeError::RoundOutOfOrder {
                line: number,
                expected,
                found: event.round,
            });
        }
        rounds.push(event);
    }

    let winner = parse_line(winner_line, last, lines.len(), "winner announcement")?;
    if !teams.contains(&winner) {
        return Err(DecodeError::UnknownWinner(winner));
    }

    Ok(BattleRecord {
        teams,
        rounds,
        winner,
    })
}

fn parse_line<T>(
    parser: fn(&str) -> IResult<&str, T>,
    line: &str,
    number: usize,
    expected: &'static str,
) -> Result<T, DecodeError> {
    match parser(line) {
        Ok(("", value)) => Ok(value),
        _ => Err(DecodeError::Malformed {
            line: number,
            expected,
            found: line.to_string(),
        }),
    }
}

fn teams_line(input: &str) -> IResult<&str, [String; 2]> {
    let (input, (first, second)) =
        separated_pair(non_empty(take_until(TEAM_SEPARATOR)), tag(TEAM_SEPARATOR), rest)
            .parse(input)?;
    if second.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::NonEmpty,
        )));
    }
    Ok((input, [first.to_string(), second.to_string()]))
}

fn round_line(input: &str) -> IResult<&str, RoundEvent> {
    let (input, (round, attacker, defender, winner)) = (
        preceded(tag(ROUND_PREFIX), map_res(digit1, |d: &str| d.parse::<u32>())),
        preceded(tag(" - "), participant),
        preceded(tag(TEAM_SEPARATOR), participant),
        preceded(tag(ROUND_WINNER), rest),
    )
        .parse(input)?;

    Ok((
        input,
        RoundEvent {
            round,
            attacker,
            defender,
            winner: winner.to_string(),
        },
    ))
}

fn participant(input: &str) -> IResult<&str, RoundParticipant> {
    let (input, (name, hp)) = (
        non_empty(take_until(HP_OPEN)),
        delimited(tag(HP_OPEN), map_res(hp_text, |s: &str| s.parse::<HpReading>()), char(')')),
    )
        .parse(input)?;

    Ok((
        input,
        RoundParticipant {
            name: name.to_string(),
            hp,
        },
    ))
}

fn hp_text(input: &str) -> IResult<&str, &str> {
    recognize((opt(char('-')), digit1, char('.'), digit1)).parse(input)
}

fn winner_line(input: &str) -> IResult<&str, String> {
    let (input, team) = preceded(tag(BATTLE_WINNER), rest).parse(input)?;
    Ok((input, team.to_string()))
}

/// Reject an empty match from `parser`
fn non_empty<'a, P>(mut parser: P) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str>
where
    P: Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>>,
{
    move |input: &'a str| {
        let (remaining, matched) = parser.parse(input)?;
        if matched.is_empty() {
            Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::NonEmpty,
            )))
        } else {
            Ok((remaining, matched))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> BattleRecord {
        BattleRecord {
            teams: ["TEAM 1".into(), "TEAM 2".into()],
            rounds: vec![
                RoundEvent {
                    round: 1,
                    attacker: RoundParticipant::new("Batman", 412.731),
                    defender: RoundParticipant::new("Joker", 230.1),
                    winner: "Batman".into(),
                },
                RoundEvent {
                    round: 2,
                    attacker: RoundParticipant::new("Spider-Man", 301.0),
                    defender: RoundParticipant::new("Doctor Octopus", 299.999),
                    winner: "Doctor Octopus".into(),
                },
            ],
            winner: "TEAM 2".into(),
        }
    }

    #[test]
    fn test_encode_templates() {
        let text = encode(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "TEAM 1 v/s TEAM 2");
        assert_eq!(
            lines[1],
            "ROUND 1 - Batman (HP: 412.73) v/s Joker (HP: 230.10) - WINNER: Batman"
        );
        assert_eq!(
            lines[2],
            "ROUND 2 - Spider-Man (HP: 301.00) v/s Doctor Octopus (HP: 300.00) - WINNER: Doctor Octopus"
        );
        assert_eq!(lines[3], "WINNER: TEAM 2");
    }

    #[test]
    fn test_decode_inverts_encode() {
        let record = sample();
        assert_eq!(decode(&encode(&record)).unwrap(), record);
    }

    #[test]
    fn test_decode_battle_without_rounds() {
        let record = decode("RED v/s BLUE\nWINNER: RED\n").unwrap();
        assert!(record.rounds.is_empty());
        assert_eq!(record.winner, "RED");
    }

    #[test]
    fn test_decode_accepts_crlf() {
        let text = encode(&sample()).replace('\n', "\r\n");
        assert_eq!(decode(&text).unwrap(), sample());
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert_eq!(decode(""), Err(DecodeError::Empty));
        assert_eq!(decode("  \n"), Err(DecodeError::Empty));
    }

    #[test]
    fn test_decode_requires_winner_line() {
        assert_eq!(
            decode("TEAM 1 v/s TEAM 2\n"),
            Err(DecodeError::MissingLine("winner announcement"))
        );
    }

    #[test]
    fn test_decode_rejects_noise_lines() {
        let mut text = encode(&sample());
        text.insert_str(text.find("ROUND 2").unwrap(), "Move 1: Batman hits Joker\n");
        match decode(&text) {
            Err(DecodeError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected malformed line, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_truncated_hp() {
        let text = "A v/s B\nROUND 1 - X (HP: 10.5) v/s Y (HP: 3.00) - WINNER: X\nWINNER: A\n";
        assert!(matches!(decode(text), Err(DecodeError::Malformed { line: 2, .. })));
    }

    #[test]
    fn test_decode_rejects_skipped_round() {
        let text = "A v/s B\nROUND 2 - X (HP: 10.50) v/s Y (HP: 3.00) - WINNER: X\nWINNER: A\n";
        assert_eq!(
            decode(text),
            Err(DecodeError::RoundOutOfOrder {
                line: 2,
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_decode_rejects_unknown_winner() {
        let text = "A v/s B\nWINNER: C\n";
        assert_eq!(decode(text), Err(DecodeError::UnknownWinner("C".into())));
    }

    #[test]
    fn test_name_checks() {
        assert!(check_character_name("Spider-Man").is_ok());
        assert!(check_character_name("").is_err());
        assert!(check_character_name("   ").is_err());
        assert!(check_character_name("Two\nLines").is_err());
        assert!(check_character_name("Sneaky (HP: 1.00)").is_err());

        assert!(check_team_names("RED", "BLUE").is_ok());
        assert!(check_team_names("RED v/s GREEN", "BLUE").is_err());
        assert!(check_team_names("RED", "").is_err());
        assert!(check_team_names("RED", "BLUE\r").is_err());
    }

    #[test]
    fn test_loggable_name_round_trips() {
        let name = loggable_character_name(" Mister\nX (HP: 9000) ").unwrap();
        assert_eq!(name, "Mister X (HP 9000)");
        assert!(check_character_name(&name).is_ok());

        let text = format!("A v/s B\nROUND 1 - {} (HP: 1.00) v/s Y (HP: 2.00) - WINNER: Y\nWINNER: B\n", name);
        assert_eq!(decode(&text).unwrap().rounds[0].attacker.name, name);

        assert_eq!(loggable_character_name(" \r\n "), None);
        assert_eq!(loggable_character_name("Storm").as_deref(), Some("Storm"));
    }

    #[test]
    fn test_negative_hp_survives() {
        let text = "A v/s B\nROUND 1 - X (HP: -0.25) v/s Y (HP: 3.00) - WINNER: Y\nWINNER: B\n";
        let record = decode(text).unwrap();
        assert_eq!(record.rounds[0].attacker.hp.as_str(), "-0.25");
        assert_eq!(encode(&record), text);
    }

    fn name() -> impl Strategy<Value = String> {
        "[A-Z][A-Za-z0-9'.-]{0,12}( [A-Za-z0-9'.-]{1,12}){0,2}"
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            teams in (name(), name()).prop_filter("distinct teams", |(a, b)| a != b),
            fights in prop::collection::vec((name(), 0.0f64..5000.0, name(), 0.0f64..5000.0, any::<bool>()), 2..12),
            first_wins in any::<bool>(),
        ) {
            let rounds = fights
                .into_iter()
                .enumerate()
                .map(|(i, (a, a_hp, d, d_hp, attacker_won))| RoundEvent {
                    round: i as u32 + 1,
                    winner: if attacker_won { a.clone() } else { d.clone() },
                    attacker: RoundParticipant::new(a, a_hp),
                    defender: RoundParticipant::new(d, d_hp),
                })
                .collect();
            let winner = if first_wins { teams.0.clone() } else { teams.1.clone() };
            let record = BattleRecord { teams: [teams.0, teams.1], rounds, winner };

            prop_assert_eq!(decode(&encode(&record)).unwrap(), record);
        }
    }
}
