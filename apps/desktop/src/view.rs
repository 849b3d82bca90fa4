//! Text rendering of controller snapshots.

use client_core::{WordSnapshot, WordStatus};

pub const TITLE: &str = "Ephemeral Word Display";
pub const LOADING_TEXT: &str = "Loading word...";
pub const RECENT_WORDS_HEADING: &str = "Recent Words";

pub fn render(snapshot: &WordSnapshot) -> Vec<String> {
    let mut lines = vec![TITLE.to_string(), String::new()];

    match &snapshot.status {
        WordStatus::Loading => lines.push(format!("  {LOADING_TEXT}")),
        WordStatus::Error { message } => lines.push(format!("  ! {message}")),
        WordStatus::Success { word } if snapshot.is_refetching() => {
            lines.push(format!("  {word}  (refreshing...)"));
        }
        WordStatus::Success { word } => lines.push(format!("  {word}")),
    }
    if let Some(updated) = snapshot.last_updated_at {
        lines.push(format!(
            "  updated {}",
            updated.with_timezone(&chrono::Local).format("%H:%M:%S")
        ));
    }

    lines.push(String::new());
    let refetch_key = if refetch_enabled(snapshot) { "[n]" } else { "[-]" };
    lines.push(format!(
        "{refetch_key} {}   [p] {}   [q] Quit",
        refetch_label(snapshot),
        polling_label(snapshot)
    ));

    if !snapshot.history.is_empty() {
        lines.push(String::new());
        lines.push(RECENT_WORDS_HEADING.to_string());
        lines.extend(snapshot.history.iter().map(|word| format!("  - {word}")));
    }

    lines.push(String::new());
    lines.push(auto_refresh_status(snapshot));
    lines
}

/// A manual refetch is unavailable until the first word has settled.
pub fn refetch_enabled(snapshot: &WordSnapshot) -> bool {
    !snapshot.is_loading()
}

pub fn refetch_label(snapshot: &WordSnapshot) -> &'static str {
    if snapshot.is_refetching() {
        "Refreshing..."
    } else {
        "New Word"
    }
}

pub fn polling_label(snapshot: &WordSnapshot) -> &'static str {
    if snapshot.polling_enabled {
        "Pause Auto-Refresh"
    } else {
        "Resume Auto-Refresh"
    }
}

pub fn auto_refresh_status(snapshot: &WordSnapshot) -> String {
    if snapshot.polling_enabled {
        format!(
            "Auto-refresh: Every {} seconds",
            snapshot.poll_interval.as_secs()
        )
    } else {
        "Auto-refresh: Paused".to_string()
    }
}
