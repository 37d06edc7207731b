//! Human-readable summaries
//!
//! Each function returns the lines to print so the CLI stays a thin loop of
//! `println!` calls.

use serde_json::Value;

use crate::models::LeaderboardEntry;
use crate::session::SessionRecord;

/// Tokens are shown as this many leading characters followed by `...`.
pub const TOKEN_PREVIEW_CHARS: usize = 30;

pub const RULE_WIDTH: usize = 50;

pub fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

pub fn token_preview(token: &str) -> String {
    let head: String = token.chars().take(TOKEN_PREVIEW_CHARS).collect();
    format!("{}...", head)
}

/// Render a JSON value the way a person would write it: strings unquoted.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn session_summary(record: &SessionRecord) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(token) = record.access_token() {
        lines.push(format!("Access Token: {}", token_preview(token)));
    }
    if let Some(token) = record.refresh_token() {
        lines.push(format!("Refresh Token: {}", token_preview(token)));
    }
    if let Some(expires_in) = record.as_map().get("expires_in") {
        lines.push(format!("Expires In: {} seconds", render_value(expires_in)));
    }
    if let Some(token_type) = record.token_type() {
        lines.push(format!("Token Type: {}", token_type));
    }
    if let Some(user) = record.user() {
        lines.push(format!("User Email: {}", user.email.unwrap_or("N/A")));
        lines.push(format!("User ID: {}", user.id.unwrap_or("N/A")));
    }

    lines
}

/// Object → one line per key; array → the first element; otherwise `Result: <v>`.
pub fn stats_summary(result: &Value) -> Vec<String> {
    match result {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, render_value(v)))
            .collect(),
        Value::Array(items) if !items.is_empty() => match &items[0] {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, render_value(v)))
                .collect(),
            first => vec![format!("Result: {}", render_value(first))],
        },
        other => vec![format!("Result: {}", render_value(other))],
    }
}

pub fn leaderboard_table(entries: &[LeaderboardEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["(no entries)".to_string()];
    }

    let name_width = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut lines = vec![format!("{:>4}  {:<name_width$}  {:>8}", "Rank", "Name", "Score")];
    for e in entries {
        lines.push(format!(
            "{:>4}  {:<name_width$}  {:>8}",
            e.rank, e.name, e.score
        ));
    }
    lines
}
