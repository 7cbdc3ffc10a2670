//! Session management CLI commands: list, show, delete.
//!
//! These work on the store directory directly, so they also run while the
//! server is down.

use std::io::Write;

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use chatkeep_core::session::store::SessionStore;
use chatkeep_infra::storage::JsonFileSessionStore;
use chatkeep_types::message::MessageRole;
use chatkeep_types::session::SessionKey;

const PREVIEW_CHARS: usize = 80;

/// Sanitize `raw`, writing a notice to `notices` when the ID changed.
///
/// Notices go to stderr in practice so `--json` output on stdout stays clean.
fn parse_key(raw: &str, notices: &mut impl Write) -> Result<SessionKey> {
    let key = SessionKey::parse(raw).with_context(|| format!("Invalid session ID '{raw}'"))?;
    if key.was_altered() {
        writeln!(
            notices,
            "  {} Session ID '{}' sanitized to '{}'",
            style("!").yellow().bold(),
            raw,
            style(key.as_str()).cyan()
        )?;
    }
    Ok(key)
}

fn preview(content: &str) -> String {
    let flat = content.replace('\n', " ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

/// List stored session keys.
pub async fn list_sessions(store: &JsonFileSessionStore, json: bool) -> Result<()> {
    let sessions = store.list().await.context("Failed to list sessions")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions in {}",
            style("i").blue().bold(),
            style(store.root().display()).cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    for key in &sessions {
        println!("  {}", style(key).cyan());
    }
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Print a stored transcript as a table.
pub async fn show_session(store: &JsonFileSessionStore, raw_id: &str, json: bool) -> Result<()> {
    let key = parse_key(raw_id, &mut std::io::stderr())?;
    let transcript = store
        .load(&key)
        .await
        .with_context(|| format!("Failed to load session '{key}'"))?;

    let Some(transcript) = transcript else {
        anyhow::bail!("Session '{key}' not found");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&transcript)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Content").fg(Color::White),
    ]);

    for (i, message) in transcript.iter().enumerate() {
        let role = match message.role {
            MessageRole::User => Cell::new("user").fg(Color::Cyan),
            MessageRole::Assistant => Cell::new("assistant").fg(Color::Green),
            MessageRole::System => Cell::new("system").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(i + 1).fg(Color::DarkGrey),
            role,
            Cell::new(preview(&message.content)),
        ]);
    }

    println!();
    println!("  Session '{}'", style(key.as_str()).cyan().bold());
    println!();
    println!("{table}");
    println!();
    println!(
        "  {} message{}",
        style(transcript.len()).bold(),
        if transcript.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Delete a stored transcript, asking first unless `force` is set.
pub async fn delete_session(
    store: &JsonFileSessionStore,
    raw_id: &str,
    force: bool,
    json: bool,
) -> Result<()> {
    let key = parse_key(raw_id, &mut std::io::stderr())?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete session '{}'?",
                style(key.as_str()).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = store
        .delete(&key)
        .await
        .with_context(|| format!("Failed to delete session '{key}'"))?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "session_id": key.as_str(), "deleted": removed })
        );
        return Ok(());
    }

    if removed {
        println!(
            "  {} Deleted session '{}'",
            style("✓").green().bold(),
            style(key.as_str()).cyan()
        );
    } else {
        println!(
            "  {} Session '{}' not found",
            style("i").blue().bold(),
            style(key.as_str()).cyan()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_content() {
        let long = "x".repeat(200);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn test_preview_flattens_newlines() {
        assert_eq!(preview("a\nb"), "a b");
    }

    #[test]
    fn test_parse_key_rejects_empty() {
        let mut notices = Vec::new();
        assert!(parse_key("../", &mut notices).is_err());
        assert_eq!(parse_key("abc", &mut notices).unwrap().as_str(), "abc");
        assert!(notices.is_empty());
    }

    #[test]
    fn test_parse_key_notice_goes_to_given_writer() {
        let mut notices = Vec::new();
        let key = parse_key("../a.b", &mut notices).unwrap();
        assert_eq!(key.as_str(), "ab");

        let text = String::from_utf8(notices).unwrap();
        assert!(text.contains("sanitized to"));
        assert!(text.contains("../a.b"));
    }

    #[tokio::test]
    async fn test_forced_delete_removes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = JsonFileSessionStore::new(tmp.path());
        let key = SessionKey::parse("abc").unwrap();
        store.save(&key, &Vec::new()).await.unwrap();

        delete_session(&store, "abc", true, true).await.unwrap();
        assert!(store.load(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_show_missing_session_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = JsonFileSessionStore::new(tmp.path());
        assert!(show_session(&store, "nope", true).await.is_err());
    }
}
