//! Progress lines printed while a session plays.

use smartdict_core::SessionConfig;
use smartdict_voice::{SequencerSnapshot, SequencerStatus, SessionSummary};

use super::tables::format_elapsed;

/// One status line for `snapshot`, e.g. `[2/5] Word 2: dog (repeat 1/3)`.
pub fn format_progress(snapshot: &SequencerSnapshot, session: &SessionConfig) -> String {
    let total = session.items.len();
    let mut line = String::new();

    if let Some(index) = snapshot.current_index.filter(|i| *i < total) {
        let phase = if snapshot.is_reviewing { "review " } else { "" };
        line.push_str(&format!("[{phase}{}/{total}] ", index + 1));
    }
    line.push_str(&snapshot.instruction);

    if snapshot.current_repeat > 0 && !snapshot.is_reviewing {
        let repeats = session.profile().vocab_repeats;
        line.push_str(&format!(" (repeat {}/{repeats})", snapshot.current_repeat));
    }
    if snapshot.status == SequencerStatus::Paused {
        line.push_str(" [paused]");
    }
    line
}

/// Closing line once the session ends.
pub fn format_summary(summary: &SessionSummary) -> String {
    let verb = if summary.stopped { "Stopped" } else { "Finished" };
    match &summary.record {
        Some(record) => format!(
            "{verb}: {} items in {}",
            record.item_count,
            format_elapsed(record.elapsed_seconds)
        ),
        None => format!("{verb} before the session started"),
    }
}
