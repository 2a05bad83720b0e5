//! Status records and the aggregate snapshot returned to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sources::SourceConfig;

/// Normalized operational state of a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiningStatus {
    Open,
    Busy,
    Closed,
    Unknown,
}

impl DiningStatus {
    /// `true` for states in which the venue is serving.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, DiningStatus::Open | DiningStatus::Busy)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DiningStatus::Open => "open",
            DiningStatus::Busy => "busy",
            DiningStatus::Closed => "closed",
            DiningStatus::Unknown => "unknown",
        }
    }

    /// Parses one of the four wire values. Anything else yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "open" => Some(DiningStatus::Open),
            "busy" => Some(DiningStatus::Busy),
            "closed" => Some(DiningStatus::Closed),
            "unknown" => Some(DiningStatus::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for DiningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Resolved status for one venue.
///
/// `is_open` is never set directly; it is derived from `status` by
/// [`StatusRecord::set_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub id: String,
    pub name: String,
    pub page_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<u8>,
    pub status: DiningStatus,
    pub is_open: bool,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusRecord {
    /// A record carrying only the venue's identity: status `unknown`, not open.
    #[must_use]
    pub fn base(source: &SourceConfig, last_updated: DateTime<Utc>) -> Self {
        Self {
            id: source.id.clone(),
            name: source.name.clone(),
            page_url: source.page_url.clone(),
            status_text: None,
            status_detail: None,
            activity_level: None,
            status: DiningStatus::Unknown,
            is_open: false,
            last_updated,
            error: None,
        }
    }

    /// A record for a resolution that failed outright. Extracted fields are
    /// discarded and the status is forced to `unknown`.
    #[must_use]
    pub fn failed(
        source: &SourceConfig,
        last_updated: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::base(source, last_updated)
        }
    }

    pub fn set_status(&mut self, status: DiningStatus) {
        self.status = status;
        self.is_open = status.is_open();
    }
}

/// Every venue's record, in configuration order, plus the assembly time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    pub halls: Vec<StatusRecord>,
    pub fetched_at: DateTime<Utc>,
}
