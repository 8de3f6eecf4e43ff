//! `lovenote countdown`

use anyhow::Result;
use console::style;

use lovenote_core::countdown::Countdown;

use crate::cli::print_json;
use crate::state::AppState;

pub fn countdown(state: &AppState, json: bool) -> Result<()> {
    let target = state.config.delivery_date;
    let left = Countdown::until(target, chrono::Utc::now());

    if json {
        return print_json(&serde_json::json!({
            "delivery_date": target.to_rfc3339(),
            "countdown": left,
        }));
    }

    println!();
    if left.is_past {
        println!(
            "  {} Confessions are being delivered. Happy Valentine's!",
            style("💝").bold()
        );
    } else {
        println!(
            "  {}  {}d  {}h  {}m  {}s",
            style("⏳").bold(),
            style(left.days).magenta().bold(),
            style(left.hours).magenta().bold(),
            style(left.minutes).magenta().bold(),
            style(left.seconds).magenta().bold()
        );
        println!(
            "  {}",
            style(format!("until {}", target.format("%B %-d, %Y %H:%M UTC"))).dim()
        );
    }
    println!();
    Ok(())
}
