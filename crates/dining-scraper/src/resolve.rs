//! Turns one venue into one [`StatusRecord`], whatever happens upstream.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use dining_core::{SourceConfig, StatusRecord};

use crate::classify::classify;
use crate::client::FetchClient;
use crate::error::FetchError;
use crate::extract::{extract_activity_level, extract_page};

/// Fetches the venue page and its activity meter concurrently and folds
/// both outcomes into a record.
///
/// Both requests always run to completion; one failing never cancels the
/// other. This function does not fail: fetch errors and panics during
/// extraction surface in the record's `error` field.
pub async fn resolve_source(
    client: &FetchClient,
    source: &SourceConfig,
    activity_base_url: &str,
) -> StatusRecord {
    let started_at = Utc::now();
    let activity_url = source.activity_url(activity_base_url);

    let (page, activity) = tokio::join!(
        client.fetch_text(&source.page_url),
        client.fetch_text(&activity_url),
    );

    if let Err(e) = &page {
        tracing::warn!(source_id = %source.id, error = %e, "page fetch failed");
    }
    if let Err(e) = &activity {
        tracing::warn!(source_id = %source.id, error = %e, "activity fetch failed");
    }

    match catch_unwind(AssertUnwindSafe(|| {
        build_record(source, started_at, &page, &activity)
    })) {
        Ok(record) => record,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(source_id = %source.id, error = %message, "status extraction panicked");
            StatusRecord::failed(source, started_at, message)
        }
    }
}

/// Builds a record from the two fetch outcomes.
///
/// Label and detail come from a successful page body, activity level from a
/// successful activity body. Status is classified from whatever was found.
#[must_use]
pub fn build_record(
    source: &SourceConfig,
    started_at: DateTime<Utc>,
    page: &Result<String, FetchError>,
    activity: &Result<String, FetchError>,
) -> StatusRecord {
    let mut record = StatusRecord::base(source, started_at);

    if let Ok(html) = page {
        let signals = extract_page(html);
        record.status_text = signals.label;
        record.status_detail = signals.detail;
    }
    if let Ok(html) = activity {
        record.activity_level = extract_activity_level(html);
    }

    record.set_status(classify(
        record.status_text.as_deref(),
        record.activity_level,
    ));
    record.error = partial_failure_message(page.is_err(), activity.is_err());
    record
}

fn partial_failure_message(page_failed: bool, activity_failed: bool) -> Option<String> {
    let failed = match (page_failed, activity_failed) {
        (true, true) => "page & activity",
        (true, false) => "page",
        (false, true) => "activity",
        (false, false) => return None,
    };
    Some(format!("Failed to load {failed} data"))
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}
