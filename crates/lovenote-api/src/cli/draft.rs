//! `lovenote draft show|clear`

use anyhow::Result;
use console::style;

use lovenote_core::draft::CONFESSION_DRAFT_KEY;
use lovenote_types::draft::ConfessionDraft;

use crate::cli::print_json;
use crate::state::AppState;

pub async fn show(state: &AppState, json: bool) -> Result<()> {
    let draft: ConfessionDraft = state
        .drafts
        .read(CONFESSION_DRAFT_KEY, ConfessionDraft::default())
        .await;

    if json {
        return print_json(&draft);
    }

    println!();
    if draft.is_blank() {
        println!(
            "  {} No saved draft. Start one with {}",
            style("i").blue().bold(),
            style("lovenote confess").yellow()
        );
        println!();
        return Ok(());
    }

    let field = |label: &str, value: Option<&str>| {
        println!(
            "  {:<14} {}",
            style(label).bold(),
            value.map(|v| style(v.to_string())).unwrap_or_else(|| style("-".to_string()).dim())
        );
    };
    field("Message", draft.message.as_deref());
    field("Mood", draft.mood.map(|m| m.label()));
    field("Song link", draft.song_link.as_deref());
    field("College", draft.college_name.as_deref());
    field("Department", draft.department.as_deref());
    field("Year", draft.year_or_batch.map(|y| y.label()));
    field("Section", draft.section.as_deref());
    field("Hint", draft.recipient_hint.as_deref());
    field("Anonymous", Some(if draft.is_anonymous { "yes" } else { "no" }));
    if !draft.is_anonymous {
        field("Name", draft.sender_name.as_deref());
        field("Email", draft.sender_email.as_deref());
        field("Phone", draft.sender_phone.as_deref());
    }
    println!();
    println!(
        "  Continue with {}",
        style("lovenote confess").yellow()
    );
    println!();
    Ok(())
}

pub async fn clear(state: &AppState, json: bool) -> Result<()> {
    let cleared = state.drafts.clear(CONFESSION_DRAFT_KEY).await;

    if json {
        return print_json(&serde_json::json!({ "cleared": cleared }));
    }
    println!();
    if cleared {
        println!("  {} Draft discarded.", style("✓").green().bold());
    } else {
        println!(
            "  {} Couldn't discard the draft; see the log for details.",
            style("✗").red().bold()
        );
    }
    println!();
    Ok(())
}
