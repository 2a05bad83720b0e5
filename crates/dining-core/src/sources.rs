//! The fixed table of venues whose status is scraped.

/// Activity-meter endpoint; a venue's `activity_id` is appended verbatim.
pub const DEFAULT_ACTIVITY_BASE_URL: &str =
    "https://dining.ucla.edu/wp-content/plugins/activity-meter/activity_ajax.php?location_id=";

/// `(id, display name, page URL, activity key)` for every configured venue,
/// in the order they appear in aggregate responses.
const DINING_HALLS: [(&str, &str, &str, u32); 4] = [
    (
        "epicuria-ackerman",
        "Epic at Ackerman",
        "https://dining.ucla.edu/epicuria-at-ackerman/",
        874,
    ),
    (
        "bruin-cafe",
        "Bruin Café",
        "https://dining.ucla.edu/bruin-cafe/",
        867,
    ),
    (
        "rendezvous",
        "Rendezvous",
        "https://dining.ucla.edu/rendezvous/",
        870,
    ),
    (
        "hedrick-study",
        "The Study at Hedrick",
        "https://dining.ucla.edu/the-study-at-hedrick/",
        871,
    ),
];

/// One venue: where its page lives and how to address its activity meter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub id: String,
    pub name: String,
    pub page_url: String,
    pub activity_id: u32,
}

impl SourceConfig {
    #[must_use]
    pub fn activity_url(&self, base_url: &str) -> String {
        format!("{base_url}{}", self.activity_id)
    }
}

/// Returns the configured venues in display order.
#[must_use]
pub fn dining_halls() -> Vec<SourceConfig> {
    DINING_HALLS
        .iter()
        .map(|&(id, name, page_url, activity_id)| SourceConfig {
            id: id.to_string(),
            name: name.to_string(),
            page_url: page_url.to_string(),
            activity_id,
        })
        .collect()
}
