//! Moderation commands: list, approve, reject, moderate, stats, issue-key.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use lovenote_types::confession::{ConfessionId, ConfessionStatus};

use crate::cli::confession::{format_relative_time, truncate_chars};
use crate::cli::print_json;
use crate::http::extractors::auth::issue_api_key;
use crate::state::AppState;

pub async fn list(state: &AppState, status: Option<String>, json: bool) -> Result<()> {
    let status = status
        .as_deref()
        .map(str::parse::<ConfessionStatus>)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;
    let confessions = state.confession_service.admin_list(status).await?;

    if json {
        return print_json(&confessions);
    }

    if confessions.is_empty() {
        println!();
        println!("  {} No confessions found.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Code").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("From").fg(Color::White),
        Cell::new("College").fg(Color::White),
        Cell::new("Message").fg(Color::White),
        Cell::new("Views").fg(Color::White),
        Cell::new("Posted").fg(Color::White),
    ]);

    for c in &confessions {
        let status_cell = match c.status {
            ConfessionStatus::Approved => Cell::new("● approved").fg(Color::Green),
            ConfessionStatus::Pending => Cell::new("○ pending").fg(Color::Yellow),
            ConfessionStatus::Rejected => Cell::new("✗ rejected").fg(Color::Red),
        };
        let from = match (&c.sender_name, &c.sender_email) {
            (Some(name), Some(email)) if !c.is_anonymous => format!("{name} <{email}>"),
            _ => c.display_sender().to_string(),
        };
        table.add_row(vec![
            Cell::new(c.id.to_string()).fg(Color::DarkGrey),
            Cell::new(&c.unique_code).fg(Color::Magenta),
            status_cell,
            Cell::new(from),
            Cell::new(&c.college_name),
            Cell::new(truncate_chars(&c.message, 40)),
            Cell::new(c.views),
            Cell::new(format_relative_time(&c.created_at)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} confession{}",
        style(confessions.len()).bold(),
        if confessions.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

pub async fn moderate(state: &AppState, id: &str, status: &str, json: bool) -> Result<()> {
    let id: ConfessionId = id
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid confession id: '{id}'"))?;
    let status = status
        .parse::<ConfessionStatus>()
        .map_err(|e| anyhow::anyhow!(e))?;

    let confession = state.confession_service.moderate(&id, status).await?;

    if json {
        return print_json(&confession);
    }
    println!();
    println!(
        "  {} {} is now {}",
        style("✓").green().bold(),
        style(&confession.unique_code).magenta(),
        style(confession.status).bold()
    );
    println!();
    Ok(())
}

pub async fn stats(state: &AppState, json: bool) -> Result<()> {
    let stats = state.confession_service.statistics().await?;

    if json {
        return print_json(&stats);
    }

    println!();
    println!(
        "  {} {}",
        style("📊").bold(),
        style(&state.config.app_name).bold()
    );
    println!();
    println!("  {}", style("── Confessions ──").dim());
    println!("  Total:     {}", style(stats.total_confessions).bold());
    println!("  Approved:  {}", style(stats.approved_confessions).green());
    if stats.pending_confessions > 0 {
        println!("  Pending:   {}", style(stats.pending_confessions).yellow());
    }
    if stats.rejected_confessions > 0 {
        println!("  Rejected:  {}", style(stats.rejected_confessions).red());
    }
    println!();
    println!("  {}", style("── Engagement ──").dim());
    println!("  Views:     {}", format_number(stats.total_views));
    println!("  Reactions: {}", format_number(stats.total_reactions));
    println!();
    println!("  {}", style("── System ──").dim());
    println!("  Data dir:  {}", style(state.data_dir.display()).dim());
    println!("  Database:  {}", style("SQLite (WAL mode)").dim());
    println!();
    Ok(())
}

pub async fn issue_key(state: &AppState, name: &str, json: bool) -> Result<()> {
    let key = issue_api_key(&state.db_pool, name).await?;

    if json {
        return print_json(&serde_json::json!({ "name": name, "api_key": key }));
    }
    println!();
    println!(
        "  {} API key issued (save this, it won't be shown again):",
        style("🔑").bold()
    );
    println!();
    println!("  {}", style(&key).yellow().bold());
    println!();
    if !state.config.admin.enabled {
        println!(
            "  {}",
            style("Admin routes are off. Set [admin] enabled = true in config.toml to use it.").dim()
        );
        println!();
    }
    Ok(())
}

fn format_number(n: i64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.5K");
        assert_eq!(format_number(2_000_000), "2.0M");
    }
}
