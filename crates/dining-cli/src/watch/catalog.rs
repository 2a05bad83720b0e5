//! Built-in fallback catalog and the rules for merging live data into it.
//!
//! Live data only ever overrides fields it actually carries. A missing field,
//! or a status outside the four known values, leaves the fallback intact, so
//! a partial or failed poll degrades to the static defaults.

use std::collections::HashMap;

use dining_core::DiningStatus;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const FALLBACK_WAIT: &str = "Live data coming...";
const FALLBACK_CLOSES_AT: &str = "Hours refresh below";

/// `(id, name, neighborhood)` for the venues shown on the board.
const CATALOG: [(&str, &str, &str); 4] = [
    ("epicuria-ackerman", "Epic at Ackerman", "Ackerman Union"),
    ("bruin-cafe", "Bruin Café", "Sproul Hall"),
    ("rendezvous", "Rendezvous", "Rieber Terrace"),
    ("hedrick-study", "The Study at Hedrick", "Hedrick Hall"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CatalogHall {
    pub id: String,
    pub name: String,
    pub neighborhood: String,
    pub status: DiningStatus,
    pub wait_time: String,
    pub closes_at: String,
    pub status_detail: Option<String>,
    pub live_status_text: Option<String>,
    pub activity_level: Option<u8>,
}

impl CatalogHall {
    /// Text for the status badge: the scraped label when there is one,
    /// otherwise a word for the status.
    pub fn badge(&self) -> &str {
        if let Some(text) = &self.live_status_text {
            return text;
        }
        match self.status {
            DiningStatus::Busy => "Busy",
            DiningStatus::Closed => "Closed",
            DiningStatus::Open => "Open",
            DiningStatus::Unknown => "Status unknown",
        }
    }
}

/// One record from the status server, read leniently: every field may be
/// missing, and a field of the wrong type reads as missing instead of
/// rejecting the payload. `status` is kept as raw text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LiveHallStatus {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status_detail: Option<String>,
    #[serde(default, deserialize_with = "lenient_activity_level")]
    pub activity_level: Option<u8>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(str::to_owned)))
}

/// Accepts any number in `0..=100`, rounded to the nearest integer.
fn lenient_activity_level<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let level = value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|n| (0.0..=100.0).contains(n))
        .map(|n| n.round() as u8);
    Ok(level)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LivePayload {
    #[serde(default)]
    pub halls: Vec<LiveHallStatus>,
}

impl LivePayload {
    /// Indexes records by venue id, skipping any without one.
    pub fn into_by_id(self) -> HashMap<String, LiveHallStatus> {
        self.halls
            .into_iter()
            .filter_map(|hall| hall.id.clone().map(|id| (id, hall)))
            .collect()
    }
}

pub(crate) fn fallback_catalog() -> Vec<CatalogHall> {
    CATALOG
        .iter()
        .map(|&(id, name, neighborhood)| CatalogHall {
            id: id.to_string(),
            name: name.to_string(),
            neighborhood: neighborhood.to_string(),
            status: DiningStatus::Open,
            wait_time: FALLBACK_WAIT.to_string(),
            closes_at: FALLBACK_CLOSES_AT.to_string(),
            status_detail: None,
            live_status_text: None,
            activity_level: None,
        })
        .collect()
}

pub(crate) fn wait_estimate(activity_level: Option<u8>) -> &'static str {
    match activity_level {
        None => "Live wait unavailable",
        Some(level) if level < 35 => "No wait",
        Some(level) if level < 65 => "10-15 min",
        Some(_) => "20+ min",
    }
}

/// Overlays live records onto the catalog by id. Catalog order and entries
/// are kept; live records for unknown ids are ignored.
pub(crate) fn merge_live(
    catalog: &[CatalogHall],
    live: &HashMap<String, LiveHallStatus>,
) -> Vec<CatalogHall> {
    catalog
        .iter()
        .map(|hall| match live.get(&hall.id) {
            None => hall.clone(),
            Some(update) => merge_one(hall, update),
        })
        .collect()
}

fn merge_one(hall: &CatalogHall, live: &LiveHallStatus) -> CatalogHall {
    let status = live
        .status
        .as_deref()
        .and_then(DiningStatus::parse)
        .unwrap_or(hall.status);

    CatalogHall {
        status,
        live_status_text: live
            .status_text
            .clone()
            .or_else(|| hall.live_status_text.clone()),
        status_detail: live
            .status_detail
            .clone()
            .or_else(|| hall.status_detail.clone()),
        activity_level: live.activity_level.or(hall.activity_level),
        wait_time: wait_estimate(live.activity_level).to_string(),
        closes_at: live
            .status_detail
            .clone()
            .unwrap_or_else(|| hall.closes_at.clone()),
        ..hall.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(json: serde_json::Value) -> HashMap<String, LiveHallStatus> {
        serde_json::from_value::<LivePayload>(json)
            .expect("payload parses")
            .into_by_id()
    }

    #[test]
    fn catalog_matches_source_table() {
        let catalog_ids: Vec<String> = fallback_catalog().into_iter().map(|h| h.id).collect();
        let source_ids: Vec<String> = dining_core::dining_halls()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(catalog_ids, source_ids);
    }

    #[test]
    fn merge_without_live_data_keeps_fallback() {
        let catalog = fallback_catalog();
        assert_eq!(merge_live(&catalog, &HashMap::new()), catalog);
    }

    #[test]
    fn merge_applies_known_fields() {
        let board = merge_live(
            &fallback_catalog(),
            &live(serde_json::json!({
                "halls": [{
                    "id": "rendezvous",
                    "status": "busy",
                    "statusText": "Open",
                    "statusDetail": "Closes at 11pm",
                    "activityLevel": 80,
                    "isOpen": true
                }]
            })),
        );
        let hall = board.iter().find(|h| h.id == "rendezvous").expect("present");
        assert_eq!(hall.status, DiningStatus::Busy);
        assert_eq!(hall.badge(), "Open");
        assert_eq!(hall.closes_at, "Closes at 11pm");
        assert_eq!(hall.wait_time, "20+ min");
        assert_eq!(hall.activity_level, Some(80));
        assert_eq!(hall.neighborhood, "Rieber Terrace");
    }

    #[test]
    fn merge_keeps_fallback_status_for_unrecognized_value() {
        let board = merge_live(
            &fallback_catalog(),
            &live(serde_json::json!({
                "halls": [{ "id": "bruin-cafe", "status": "maintenance" }]
            })),
        );
        let hall = board.iter().find(|h| h.id == "bruin-cafe").expect("present");
        assert_eq!(hall.status, DiningStatus::Open);
        assert_eq!(hall.closes_at, FALLBACK_CLOSES_AT);
        assert_eq!(hall.wait_time, "Live wait unavailable");
        assert_eq!(hall.badge(), "Open");
    }

    #[test]
    fn merge_ignores_records_without_id_or_unknown_venue() {
        let catalog = fallback_catalog();
        let board = merge_live(
            &catalog,
            &live(serde_json::json!({
                "halls": [
                    { "status": "closed" },
                    { "id": "somewhere-else", "status": "closed" }
                ]
            })),
        );
        assert_eq!(board, catalog);
    }

    #[test]
    fn unknown_status_is_applied_when_reported() {
        let board = merge_live(
            &fallback_catalog(),
            &live(serde_json::json!({
                "halls": [{ "id": "hedrick-study", "status": "unknown", "error": "Failed to load page data" }]
            })),
        );
        let hall = board.iter().find(|h| h.id == "hedrick-study").expect("present");
        assert_eq!(hall.status, DiningStatus::Unknown);
        assert_eq!(hall.badge(), "Status unknown");
    }

    #[test]
    fn wrong_typed_fields_do_not_discard_the_payload() {
        let records = live(serde_json::json!({
            "halls": [
                { "id": "bruin-cafe", "status": 3, "statusText": ["Open"], "activityLevel": "lots" },
                { "id": "rendezvous", "status": "closed", "activityLevel": 72.5 },
                { "id": "hedrick-study", "status": "busy", "activityLevel": 140 }
            ]
        }));
        assert_eq!(records.len(), 3);

        let board = merge_live(&fallback_catalog(), &records);
        let cafe = board.iter().find(|h| h.id == "bruin-cafe").expect("present");
        assert_eq!(cafe.status, DiningStatus::Open);
        assert_eq!(cafe.live_status_text, None);
        assert_eq!(cafe.activity_level, None);

        let rendezvous = board.iter().find(|h| h.id == "rendezvous").expect("present");
        assert_eq!(rendezvous.status, DiningStatus::Closed);
        assert_eq!(rendezvous.activity_level, Some(73));

        let hedrick = board.iter().find(|h| h.id == "hedrick-study").expect("present");
        assert_eq!(hedrick.status, DiningStatus::Busy);
        assert_eq!(hedrick.activity_level, None);
        assert_eq!(hedrick.wait_time, "Live wait unavailable");
    }

    #[test]
    fn record_with_non_string_id_is_skipped() {
        let records = live(serde_json::json!({
            "halls": [
                { "id": 7, "status": "closed" },
                { "id": "rendezvous", "status": "closed" }
            ]
        }));
        assert_eq!(records.len(), 1);
        assert!(records.contains_key("rendezvous"));
    }

    #[test]
    fn wait_estimate_bands() {
        assert_eq!(wait_estimate(None), "Live wait unavailable");
        assert_eq!(wait_estimate(Some(0)), "No wait");
        assert_eq!(wait_estimate(Some(34)), "No wait");
        assert_eq!(wait_estimate(Some(35)), "10-15 min");
        assert_eq!(wait_estimate(Some(64)), "10-15 min");
        assert_eq!(wait_estimate(Some(65)), "20+ min");
    }

    #[test]
    fn payload_without_halls_is_empty() {
        assert!(live(serde_json::json!({ "error": "boom" })).is_empty());
    }
}
