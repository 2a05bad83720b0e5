//! `dining-cli watch`: poll the status server and keep a merged board.

mod catalog;

use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::Duration;

use catalog::{fallback_catalog, merge_live, CatalogHall, LiveHallStatus, LivePayload};

const POLL_TIMEOUT_SECS: u64 = 15;

pub(crate) async fn run_watch(api_url: &str, interval_secs: u64, once: bool) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(POLL_TIMEOUT_SECS))
        .build()?;
    let catalog = fallback_catalog();
    let mut live: HashMap<String, LiveHallStatus> = HashMap::new();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping watch");
                return Ok(());
            }
        }

        match poll_statuses(&client, api_url).await {
            Ok(next) => live = next,
            // Keep showing the previous view; the next tick retries.
            Err(e) => tracing::error!(error = %e, "failed to load dining hall statuses"),
        }

        print!("{}", render_board(&merge_live(&catalog, &live)));

        if once {
            return Ok(());
        }
    }
}

async fn poll_statuses(
    client: &reqwest::Client,
    api_url: &str,
) -> anyhow::Result<HashMap<String, LiveHallStatus>> {
    let url = format!("{}/api/dining/status", api_url.trim_end_matches('/'));
    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("request failed with status {}", status.as_u16());
    }
    let payload: LivePayload = response.json().await?;
    Ok(payload.into_by_id())
}

fn render_board(halls: &[CatalogHall]) -> String {
    let mut out = String::new();
    for hall in halls {
        let _ = writeln!(out, "{} ({})", hall.name, hall.neighborhood);
        let _ = writeln!(out, "  [{}] {}", hall.status, hall.badge());
        let _ = writeln!(out, "  wait: {}  closes: {}", hall.wait_time, hall.closes_at);
        if let Some(detail) = &hall.status_detail {
            if *detail != hall.closes_at {
                let _ = writeln!(out, "  {detail}");
            }
        }
    }
    out
}
