//! Concurrent fan-out over every configured venue.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dining_core::{AggregateResponse, AppConfig, SourceConfig, StatusRecord};

use crate::client::FetchClient;
use crate::error::{AggregateError, FetchError};
use crate::resolve::{panic_message, resolve_source};

/// Resolves every source concurrently, one spawned task per source.
///
/// Records come back in `sources` order. A task that panics is replaced by a
/// degraded record for its source so the other venues are unaffected. A task
/// that was cancelled means the fan-out itself was torn down, and the whole
/// aggregate fails.
///
/// # Errors
///
/// Returns [`AggregateError::Cancelled`] if any resolution task was cancelled
/// before it produced a record.
pub async fn aggregate<F, Fut>(
    sources: &[SourceConfig],
    resolve: F,
) -> Result<AggregateResponse, AggregateError>
where
    F: Fn(SourceConfig) -> Fut,
    Fut: Future<Output = StatusRecord> + Send + 'static,
{
    let handles: Vec<_> = sources
        .iter()
        .cloned()
        .map(|source| tokio::spawn(resolve(source)))
        .collect();

    let outcomes = futures::future::join_all(handles).await;

    let mut halls = Vec::with_capacity(sources.len());
    for (source, outcome) in sources.iter().zip(outcomes) {
        match outcome {
            Ok(record) => halls.push(record),
            Err(join_err) if join_err.is_panic() => {
                let message = panic_message(join_err.into_panic().as_ref());
                tracing::error!(source_id = %source.id, error = %message, "status resolution panicked");
                halls.push(StatusRecord::failed(source, Utc::now(), message));
            }
            Err(join_err) => {
                return Err(AggregateError::Cancelled {
                    source_id: source.id.clone(),
                    reason: join_err.to_string(),
                });
            }
        }
    }

    let degraded = halls.iter().filter(|r| r.error.is_some()).count();
    tracing::info!(halls = halls.len(), degraded, "status snapshot assembled");

    Ok(AggregateResponse {
        halls,
        fetched_at: Utc::now(),
    })
}

/// Shared, stateless entry point used by the server and CLI.
#[derive(Debug, Clone)]
pub struct StatusService {
    client: Arc<FetchClient>,
    sources: Arc<[SourceConfig]>,
    activity_base_url: Arc<str>,
}

impl StatusService {
    #[must_use]
    pub fn new(client: FetchClient, sources: Vec<SourceConfig>, activity_base_url: &str) -> Self {
        Self {
            client: Arc::new(client),
            sources: sources.into(),
            activity_base_url: Arc::from(activity_base_url),
        }
    }

    /// Builds a service over `sources` with the fetch settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, sources: Vec<SourceConfig>) -> Result<Self, FetchError> {
        let client = FetchClient::new(
            Duration::from_secs(config.request_timeout_secs),
            &config.user_agent,
            config.max_redirects,
        )?;
        Ok(Self::new(client, sources, &config.activity_base_url))
    }

    #[must_use]
    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    /// Resolves every configured venue once.
    ///
    /// # Errors
    ///
    /// See [`aggregate`].
    pub async fn snapshot(&self) -> Result<AggregateResponse, AggregateError> {
        aggregate(&self.sources, |source| {
            let client = Arc::clone(&self.client);
            let base_url = Arc::clone(&self.activity_base_url);
            async move { resolve_source(&client, &source, &base_url).await }
        })
        .await
    }
}
