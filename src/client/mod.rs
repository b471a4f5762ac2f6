pub mod types;

use crate::error::MonitorError;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;
use types::JobStatusResponse;

/// Anything that can report the current job status once per tick.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<JobStatusResponse, MonitorError>;
}

/// HTTP client for the job status endpoint
pub struct StatusClient {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl StatusClient {
    pub fn new(endpoint: Url) -> Self {
        Self::with_http_client(endpoint, reqwest::Client::new())
    }

    /// Use a pre-built client, e.g. one that carries the admin session cookie.
    pub fn with_http_client(endpoint: Url, http_client: reqwest::Client) -> Self {
        Self {
            endpoint,
            http_client,
        }
    }

    /// Resolve `endpoint` (absolute, or relative to `base`) into a client.
    pub fn from_endpoint(endpoint: &str, base: Option<&Url>) -> Result<Self, MonitorError> {
        Ok(Self::new(resolve_endpoint(endpoint, base)?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Single GET of the status endpoint. No retries and no timeout.
    pub async fn fetch_status(&self) -> Result<JobStatusResponse, MonitorError> {
        let response = self
            .http_client
            .get(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::HttpStatus(status));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl StatusSource for StatusClient {
    async fn fetch_status(&self) -> Result<JobStatusResponse, MonitorError> {
        StatusClient::fetch_status(self).await
    }
}

pub(crate) fn resolve_endpoint(endpoint: &str, base: Option<&Url>) -> Result<Url, MonitorError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(MonitorError::InvalidEndpoint("empty endpoint".to_string()));
    }

    let parsed = match base {
        Some(base) => base.join(endpoint),
        None => Url::parse(endpoint),
    };

    parsed.map_err(|e| MonitorError::InvalidEndpoint(format!("{}: {}", endpoint, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_endpoint() {
        let url = resolve_endpoint("http://admin.local/job/status/42/", None).expect("Failed to resolve");
        assert_eq!(url.as_str(), "http://admin.local/job/status/42/");
    }

    #[test]
    fn test_resolve_relative_endpoint_against_base() {
        let base = Url::parse("https://admin.local/admin/app/model/").expect("Invalid base");
        let url = resolve_endpoint("/status/42", Some(&base)).expect("Failed to resolve");
        assert_eq!(url.as_str(), "https://admin.local/status/42");
    }

    #[test]
    fn test_relative_endpoint_without_base_is_rejected() {
        let err = resolve_endpoint("/status/42", None).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_blank_endpoint_is_rejected() {
        let err = resolve_endpoint("   ", None).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidEndpoint(_)));
    }
}
