pub mod aggregate;
pub mod classify;
pub mod client;
pub mod error;
pub mod extract;
pub mod resolve;

pub use aggregate::{aggregate, StatusService};
pub use classify::{classify, BUSY_THRESHOLD};
pub use client::FetchClient;
pub use error::{AggregateError, FetchError};
pub use extract::{decode_html, extract_activity_level, extract_page, PageSignals};
pub use resolve::{build_record, resolve_source};
