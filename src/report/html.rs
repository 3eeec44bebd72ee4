//! HTML rendering of a decoded battle record

use crate::battle_log::{BattleRecord, RoundParticipant};
use std::fmt::Write;

const STYLE: &str = "body { font-family: Arial, sans-serif; background: #f4f4f4; color: #222; }\n\
.container { max-width: 760px; margin: 0 auto; padding: 16px; background: #fff; }\n\
h1 { text-align: center; }\n\
table { width: 100%; border-collapse: collapse; }\n\
th, td { border: 1px solid #ccc; padding: 6px 8px; text-align: left; }\n\
th { background: #333; color: #fff; }\n\
.winner { font-size: 1.3em; font-weight: bold; text-align: center; }\n\
.footer { margin-top: 24px; font-size: 0.8em; color: #777; text-align: center; }";

/// Render the full report page
pub fn render(record: &BattleRecord) -> String {
    let [first, second] = &record.teams;
    let mut html = String::with_capacity(1024 + record.rounds.len() * 160);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>Battle Results</title>\n<style>\n{}\n</style>", STYLE);
    html.push_str("</head>\n<body>\n<div class=\"container\">\n");
    let _ = writeln!(
        html,
        "<h1>Battle Results</h1>\n<h2>{} v/s {}</h2>",
        escape(first),
        escape(second)
    );

    html.push_str("<table>\n<tr><th>Round</th><th>Member ");
    html.push_str(&escape(first));
    html.push_str("</th><th>Member ");
    html.push_str(&escape(second));
    html.push_str("</th><th>Winner</th></tr>\n");
    for event in &record.rounds {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            event.round,
            participant(&event.attacker),
            participant(&event.defender),
            escape(&event.winner)
        );
    }
    html.push_str("</table>\n");

    let _ = writeln!(html, "<p class=\"winner\">Winner: {}</p>", escape(&record.winner));
    html.push_str("<div class=\"footer\">Superhero battle simulator</div>\n");
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// Plain-text alternative for clients that do not render HTML
pub fn render_text(record: &BattleRecord) -> String {
    let [first, second] = &record.teams;
    let mut text = format!("Battle Results: {} v/s {}\n\n", first, second);
    for event in &record.rounds {
        let _ = writeln!(
            text,
            "Round {}: {} ({} HP) v/s {} ({} HP), winner {}",
            event.round,
            event.attacker.name,
            event.attacker.hp,
            event.defender.name,
            event.defender.hp,
            event.winner
        );
    }
    let _ = write!(text, "\nWinner: {}\n", record.winner);
    text
}

fn participant(p: &RoundParticipant) -> String {
    format!("{} (HP: {})", escape(&p.name), p.hp)
}

/// Escape text for use in HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle_log::RoundEvent;

    fn record() -> BattleRecord {
        BattleRecord {
            teams: ["TEAM 1".into(), "TEAM 2".into()],
            rounds: vec![
                RoundEvent {
                    round: 1,
                    attacker: RoundParticipant::new("Batman", 412.73),
                    defender: RoundParticipant::new("<Joker>", 230.1),
                    winner: "Batman".into(),
                },
                RoundEvent {
                    round: 2,
                    attacker: RoundParticipant::new("Batman", 412.73),
                    defender: RoundParticipant::new("Bane", 390.0),
                    winner: "Batman".into(),
                },
            ],
            winner: "TEAM 1".into(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("Tom & \"Jerry\" <3"), "Tom &amp; &quot;Jerry&quot; &lt;3");
        assert_eq!(escape("Black Widow"), "Black Widow");
    }

    #[test]
    fn test_render_contains_every_round() {
        let html = render(&record());
        assert!(html.contains("<h1>Battle Results</h1>"));
        assert_eq!(html.matches("<tr><td>").count(), 2);
        assert!(html.contains("Batman (HP: 412.73)"));
        assert!(html.contains("&lt;Joker&gt; (HP: 230.10)"));
        assert!(!html.contains("<Joker>"));
        assert!(html.contains("Winner: TEAM 1"));
    }

    #[test]
    fn test_render_without_rounds() {
        let record = BattleRecord {
            rounds: Vec::new(),
            ..record()
        };
        let html = render(&record);
        assert_eq!(html.matches("<tr><td>").count(), 0);
        assert!(html.contains("Winner: TEAM 1"));
    }

    #[test]
    fn test_text_alternative() {
        let text = render_text(&record());
        assert!(text.starts_with("Battle Results: TEAM 1 v/s TEAM 2"));
        assert!(text.contains("Round 2: Batman (412.73 HP) v/s Bane (390.00 HP), winner Batman"));
        assert!(text.trim_end().ends_with("Winner: TEAM 1"));
    }
}
