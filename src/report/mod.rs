//! Battle reporting: console output, HTML rendering and delivery

pub mod console;
pub mod html;
pub mod notifier;

pub use notifier::{validate_recipient, MailgunNotifier, Report, ReportChannel};

use crate::battle_log::BattleRecord;

/// Build the deliverable report for a decoded battle record
pub fn build_report(record: &BattleRecord) -> Report {
    Report::today(html::render_text(record), html::render(record))
}
