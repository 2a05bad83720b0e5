//! GET client that follows a bounded number of redirects by hand.

use std::time::Duration;

use reqwest::header::{ACCEPT, LOCATION};
use reqwest::{Client, StatusCode, Url};

use crate::error::FetchError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

/// Fetches page bodies as text.
///
/// Automatic redirects are disabled on the inner client so each hop is a
/// separate request and gets a fresh timeout budget. 301, 302, 307 and 308
/// responses carrying a `Location` header are followed while fewer than
/// `max_redirects` hops have been taken; once the bound is reached the
/// current response is accepted as-is, so a redirect that lands on the bound
/// yields its own (often empty) body rather than an error.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    timeout: Duration,
    max_redirects: u8,
}

impl FetchClient {
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout: Duration, user_agent: &str, max_redirects: u8) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            timeout,
            max_redirects,
        })
    }

    /// GETs `url` and returns the terminal response body.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Timeout`] — a hop produced no complete response within the budget.
    /// - [`FetchError::Network`] — connection, DNS or TLS failure.
    /// - [`FetchError::Http`] — the terminal response has status 400 or above.
    /// - [`FetchError::InvalidUrl`] — `url` or a `Location` header cannot be parsed.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let mut current = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        let mut hops: u8 = 0;

        loop {
            let response = self
                .client
                .get(current.clone())
                .header(ACCEPT, ACCEPT_HTML)
                .send()
                .await
                .map_err(|e| self.transport_error(&current, e))?;
            let status = response.status();

            if is_followable_redirect(status) && hops < self.max_redirects {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);

                if let Some(location) = location {
                    let next = current.join(&location).map_err(|e| FetchError::InvalidUrl {
                        url: location.clone(),
                        reason: e.to_string(),
                    })?;
                    // Release the redirect's connection before the next hop.
                    drop(response);
                    hops += 1;
                    tracing::debug!(from = %current, to = %next, hop = hops, "following redirect");
                    current = next;
                    continue;
                }
            }

            if status.as_u16() >= 400 {
                return Err(FetchError::Http {
                    url: current.to_string(),
                    status: status.as_u16(),
                });
            }

            return response
                .text()
                .await
                .map_err(|e| self.transport_error(&current, e));
        }
    }

    fn transport_error(&self, url: &Url, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

fn is_followable_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn followable_redirects_exclude_see_other() {
        assert!(is_followable_redirect(StatusCode::MOVED_PERMANENTLY));
        assert!(is_followable_redirect(StatusCode::FOUND));
        assert!(is_followable_redirect(StatusCode::TEMPORARY_REDIRECT));
        assert!(is_followable_redirect(StatusCode::PERMANENT_REDIRECT));
        assert!(!is_followable_redirect(StatusCode::SEE_OTHER));
        assert!(!is_followable_redirect(StatusCode::OK));
    }

    #[tokio::test]
    async fn fetch_text_rejects_unparseable_url() {
        let client = FetchClient::new(Duration::from_secs(1), "dining-test/0.1", 3)
            .expect("client builds");
        let err = client.fetch_text("not a url").await.unwrap_err();
        assert!(
            matches!(err, FetchError::InvalidUrl { .. }),
            "expected InvalidUrl, got: {err:?}"
        );
    }
}
