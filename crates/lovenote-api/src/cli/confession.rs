//! Reading and reacting: show, feed, search, react.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use lovenote_core::service::confession::{ConfessionView, SearchCriteria};
use lovenote_core::session::session_identifier;
use lovenote_types::confession::{
    Confession, PublicConfession, ReactionCounts, ReactionType, mood_emoji,
};
use lovenote_types::error::ConfessionError;
use lovenote_types::music::MusicKind;

use crate::cli::print_json;
use crate::state::AppState;

/// Show one confession by code and count the view.
pub async fn show(state: &AppState, code: &str, json: bool) -> Result<()> {
    let session = session_identifier(&state.drafts).await;
    let view = state
        .confession_service
        .find_by_code(code, Some(&session))
        .await?;

    let Some(view) = view else {
        if json {
            return print_json(&serde_json::Value::Null);
        }
        println!();
        println!(
            "  {} No confession found for code {}",
            style("i").blue().bold(),
            style(code.trim().to_uppercase()).yellow()
        );
        println!();
        return Ok(());
    };

    if json {
        return print_json(&serde_json::json!({
            "confession": PublicConfession::from(&view.confession),
            "reactions": view.reactions,
            "my_reactions": view.my_reactions,
            "music": view.music,
        }));
    }

    render_view(&view);
    Ok(())
}

/// Print the newest approved confessions.
pub async fn feed(state: &AppState, limit: i64, offset: Option<i64>, json: bool) -> Result<()> {
    let confessions = state
        .confession_service
        .feed(Some(limit), offset)
        .await?;
    print_list(&confessions, json, "No confessions yet. Be the first:", "lovenote confess")
}

/// Print approved confessions matching the given details.
pub async fn search(state: &AppState, criteria: SearchCriteria, json: bool) -> Result<()> {
    let confessions = match state.confession_service.search(&criteria).await {
        Ok(found) => found,
        Err(ConfessionError::MissingSearchCriteria) => {
            anyhow::bail!(
                "enter at least one of --college, --department, --year or --name"
            );
        }
        Err(e) => return Err(e.into()),
    };
    print_list(&confessions, json, "Nothing matched. Try fewer details, or browse:", "lovenote feed")
}

/// React to a confession as this machine's session.
pub async fn react(state: &AppState, code: &str, reaction: &str, json: bool) -> Result<()> {
    let reaction_type = reaction
        .parse::<ReactionType>()
        .map_err(|e| anyhow::anyhow!(e))?;
    let session = session_identifier(&state.drafts).await;

    let counts = match state
        .confession_service
        .react(code, reaction_type, &session)
        .await
    {
        Ok(counts) => counts,
        Err(ConfessionError::AlreadyReacted(kind)) if !json => {
            println!();
            println!(
                "  {} You already sent {} to this one.",
                style("i").blue().bold(),
                kind.emoji()
            );
            println!();
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        return print_json(&counts);
    }
    println!();
    println!(
        "  {} {} sent!",
        style("✓").green().bold(),
        reaction_type.emoji()
    );
    println!("  {}", format_reactions(&counts));
    println!();
    Ok(())
}

fn print_list(confessions: &[Confession], json: bool, empty_hint: &str, command: &str) -> Result<()> {
    if json {
        let public: Vec<PublicConfession> = confessions.iter().map(PublicConfession::from).collect();
        return print_json(&public);
    }

    if confessions.is_empty() {
        println!();
        println!(
            "  {} {} {}",
            style("i").blue().bold(),
            empty_hint,
            style(command).yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Code").fg(Color::White),
        Cell::new("").fg(Color::White),
        Cell::new("For").fg(Color::White),
        Cell::new("College").fg(Color::White),
        Cell::new("Message").fg(Color::White),
        Cell::new("Posted").fg(Color::White),
    ]);

    for c in confessions {
        table.add_row(vec![
            Cell::new(&c.unique_code).fg(Color::Magenta),
            Cell::new(mood_emoji(c.mood)),
            Cell::new(c.recipient_hint.as_deref().unwrap_or("-")).fg(Color::Cyan),
            Cell::new(format!("{} · {}", c.college_name, c.year_or_batch)),
            Cell::new(truncate_chars(&c.message, 60)),
            Cell::new(format_relative_time(&c.created_at)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} confession{}  ·  open one with {}",
        style(confessions.len()).bold(),
        if confessions.len() == 1 { "" } else { "s" },
        style("lovenote show <code>").yellow()
    );
    println!();
    Ok(())
}

/// Styled card for one confession.
pub fn render_view(view: &ConfessionView) {
    let c = &view.confession;
    let mood = match c.mood {
        Some(mood) => format!("{} {}", mood.emoji(), mood.label()),
        None => mood_emoji(None).to_string(),
    };

    println!();
    println!("  {}", style(mood).magenta().bold());
    let mut details = vec![c.college_name.clone()];
    if let Some(department) = &c.department {
        details.push(department.clone());
    }
    details.push(c.year_or_batch.to_string());
    if let Some(section) = &c.section {
        details.push(format!("Section {section}"));
    }
    println!("  {}", style(details.join(" · ")).dim());
    println!();

    if let Some(hint) = &c.recipient_hint {
        println!("  {} {}", style("To:").bold(), style(hint).cyan());
    }
    for line in c.message.lines() {
        println!("  {}", style(line).italic());
    }
    println!();
    println!("  {} {}", style("From:").bold(), c.display_sender());
    if !c.is_anonymous {
        if let Some(ps) = &c.additional_message {
            println!("  {} {}", style("P.S.").bold(), ps);
        }
    }

    if let Some(music) = &view.music {
        let label = match music.kind {
            MusicKind::Video => "🎬 Video",
            MusicKind::Audio => "🎵 Song",
            MusicKind::Link => "🔗 Link",
        };
        let target = music.embed_url.as_deref().unwrap_or(&music.link);
        println!("  {} {}", style(label).bold(), style(target).underlined());
    }

    println!();
    println!("  {}", format_reactions(&view.reactions));
    if !view.my_reactions.is_empty() {
        let mine: Vec<&str> = view.my_reactions.iter().map(|r| r.emoji()).collect();
        println!("  {} {}", style("You reacted:").dim(), mine.join(" "));
    }
    println!(
        "  {}",
        style(format!(
            "{} view{} · code {} · {}",
            c.views,
            if c.views == 1 { "" } else { "s" },
            c.unique_code,
            format_relative_time(&c.created_at)
        ))
        .dim()
    );
    println!();
}

fn format_reactions(counts: &ReactionCounts) -> String {
    ReactionType::ALL
        .iter()
        .map(|kind| format!("{} {}", kind.emoji(), counts.get(*kind)))
        .collect::<Vec<_>>()
        .join("   ")
}

/// Cut `s` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate_chars(s: &str, max: usize) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

pub fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let diff = chrono::Utc::now() - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}
