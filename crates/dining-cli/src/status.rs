//! `dining-cli status`: one in-process snapshot.

use std::fmt::Write as _;

use dining_core::{AggregateResponse, AppConfig};
use dining_scraper::StatusService;

pub(crate) async fn run_status(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let service = StatusService::from_config(config, dining_core::dining_halls())?;
    let snapshot = service.snapshot().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_snapshot(&snapshot));
    }
    Ok(())
}

fn render_snapshot(snapshot: &AggregateResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dining status as of {}", snapshot.fetched_at.to_rfc3339());
    for hall in &snapshot.halls {
        let activity = hall
            .activity_level
            .map_or_else(|| "-".to_string(), |level| format!("{level}%"));
        let _ = writeln!(
            out,
            "  {:<24} {:<8} {:>5}  {}",
            hall.name,
            hall.status,
            activity,
            hall.status_text.as_deref().unwrap_or("")
        );
        if let Some(error) = &hall.error {
            let _ = writeln!(out, "  {:<24} ! {error}", "");
        }
    }
    out
}
