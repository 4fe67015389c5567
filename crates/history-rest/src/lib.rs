//! REST history store backend.
//!
//! [`EngineClient`] implements [`HistoryStore`] against a
//! Camunda-compatible workflow engine's history REST API:
//! `GET /engine-rest/history/process-instance` for pages,
//! `GET /engine-rest/history/process-instance/count` for totals, and
//! `DELETE /engine-rest/history/process-instance/{id}` for removal.
//!
//! # Quick Start
//!
//! ```no_run
//! use flowreap_history::HistoryStore;
//! use flowreap_history_rest::EngineClient;
//!
//! # async fn example() -> Result<(), flowreap_history::HistoryError> {
//! let client = EngineClient::new("http://localhost:8080");
//! let oldest = client.list_finished(10).await?;
//! println!("{} finished instances in first page", oldest.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use tracing::warn;

use flowreap_history::{
    ENGINE_TIME_FORMAT, HistoryError, HistoryStore, InstanceCount, ProcessInstance,
};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timezone used when a configured name does not resolve.
const FALLBACK_TIMEZONE: Tz = Tz::Europe__Berlin;

/// Resolve an IANA timezone name, falling back to Europe/Berlin with a
/// warning when the name is unknown.
///
/// The engine compares `finishedBefore` values in its own local time,
/// so the client must format cutoffs in a configured zone rather than
/// always UTC.
pub fn resolve_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        warn!(timezone = %name, "unknown timezone, falling back to Europe/Berlin");
        FALLBACK_TIMEZONE
    })
}

/// HTTP client for the workflow engine's history API.
#[derive(Debug, Clone)]
pub struct EngineClient {
    client: Client,
    base_url: String,
    timezone: Tz,
}

/// Builder for configuring an [`EngineClient`].
#[derive(Debug)]
pub struct EngineClientBuilder {
    base_url: String,
    timeout: Duration,
    timezone: Tz,
    client: Option<Client>,
}

impl EngineClientBuilder {
    /// Create a new builder with the given engine base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            timezone: FALLBACK_TIMEZONE,
            client: None,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timezone used to format `finishedBefore` cutoffs.
    #[must_use]
    pub fn timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Use a custom reqwest Client.
    ///
    /// Useful for configuring TLS, proxies, or other advanced settings.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<EngineClient, HistoryError> {
        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| HistoryError::Connection(e.to_string()))?,
        };

        Ok(EngineClient {
            client,
            base_url: self.base_url,
            timezone: self.timezone,
        })
    }
}

impl EngineClient {
    /// Create a new client with default configuration.
    pub fn new(base_url: impl Into<String>) -> Self {
        EngineClientBuilder::new(base_url)
            .build()
            .expect("default client configuration should not fail")
    }

    /// Create a builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> EngineClientBuilder {
        EngineClientBuilder::new(base_url)
    }

    /// Get the engine base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list(
        &self,
        limit: usize,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<ProcessInstance>, HistoryError> {
        let url = format!("{}/engine-rest/history/process-instance", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("maxResults", limit.to_string()),
            ("firstResult", "0".to_string()),
            ("sortBy", "endTime".to_string()),
            ("sortOrder", "asc".to_string()),
            ("finished", "true".to_string()),
        ];
        if let Some(before) = before {
            let cutoff = before
                .with_timezone(&self.timezone)
                .format(ENGINE_TIME_FORMAT)
                .to_string();
            query.push(("finishedBefore", cutoff));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| HistoryError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HistoryError::Http {
                status: status.as_u16(),
                message: format!("failed to list history: {body}"),
            });
        }

        response
            .json::<Vec<ProcessInstance>>()
            .await
            .map_err(|e| HistoryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl HistoryStore for EngineClient {
    async fn list_finished(&self, limit: usize) -> Result<Vec<ProcessInstance>, HistoryError> {
        self.list(limit, None).await
    }

    async fn list_finished_before(
        &self,
        limit: usize,
        before: DateTime<Utc>,
    ) -> Result<Vec<ProcessInstance>, HistoryError> {
        self.list(limit, Some(before)).await
    }

    async fn delete_instance(&self, id: &str) -> Result<(), HistoryError> {
        let url = format!(
            "{}/engine-rest/history/process-instance/{id}",
            self.base_url
        );

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| HistoryError::Connection(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HistoryError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HistoryError::Http {
                status: status.as_u16(),
                message: format!("failed to delete instance {id}: {body}"),
            });
        }
        Ok(())
    }

    async fn count_finished(&self) -> Result<i64, HistoryError> {
        let url = format!(
            "{}/engine-rest/history/process-instance/count",
            self.base_url
        );

        let response = self
            .client
            .get(&url)
            .query(&[("finished", "true")])
            .send()
            .await
            .map_err(|e| HistoryError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HistoryError::Http {
                status: status.as_u16(),
                message: format!("failed to count history: {body}"),
            });
        }

        let count = response
            .json::<InstanceCount>()
            .await
            .map_err(|e| HistoryError::Decode(e.to_string()))?;
        Ok(count.count)
    }
}
