//! ViaCEP lookup client implementation
//!
//! Provides an async HTTP client for ViaCEP-compatible address services.
//! Each lookup is a single GET request; there are no retries and no
//! caching.

use std::time::Duration;

use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{Error, Result};

use super::types::{CepAddress, CepResponse};

/// Public ViaCEP API base URL
pub const VIACEP_BASE_URL: &str = "https://viacep.com.br/ws";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// CEP lookup client
///
/// Thread-safe client for resolving Brazilian postal codes to address
/// fragments. The base URL is always explicit so tests and alternate
/// deployments can point at their own endpoint.
#[derive(Debug, Clone)]
pub struct CepClient {
    /// HTTP client for making requests
    http_client: HttpClient,
    /// Base URL for the lookup service
    base_url: String,
}

/// Builder for creating a CepClient
pub struct CepClientBuilder {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for CepClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CepClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout_secs: None,
        }
    }

    /// Set the base URL (defaults to the public ViaCEP endpoint)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Build the CepClient
    pub fn build(self) -> Result<CepClient> {
        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(Error::Network)?;

        Ok(CepClient {
            http_client,
            base_url: self
                .base_url
                .unwrap_or_else(|| VIACEP_BASE_URL.to_string()),
        })
    }
}

impl CepClient {
    /// Create a client against the public ViaCEP endpoint
    pub fn new() -> Result<Self> {
        CepClientBuilder::new().build()
    }

    /// Create a new builder for CepClient
    pub fn builder() -> CepClientBuilder {
        CepClientBuilder::new()
    }

    /// Get the configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a postal code to an address fragment
    ///
    /// The CEP is interpolated into the request path as given; callers
    /// that accept hyphenated input normalize it first. Outcomes:
    ///
    /// - Empty response body: [`Error::NotFound`]
    /// - HTTP 400: [`Error::InvalidData`] carrying the status text
    /// - `erro` marker in the body: [`Error::InvalidCep`]
    /// - Any other failure: [`Error::Network`] or [`Error::Lookup`]
    pub async fn lookup(&self, cep: &str) -> Result<CepAddress> {
        let url = format!("{}/{}/json/", self.base_url, cep);

        debug!(cep = %cep, "Looking up CEP");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Error::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Network)?;

        if body.trim().is_empty() {
            return Err(Error::NotFound);
        }

        if status == StatusCode::BAD_REQUEST {
            let reason = status.canonical_reason().unwrap_or("Bad Request");
            return Err(Error::InvalidData(vec![reason.to_string()]));
        }

        if !status.is_success() {
            return Err(Error::Lookup(format!(
                "unexpected status {} from lookup service",
                status
            )));
        }

        let parsed: CepResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Lookup(format!("malformed lookup response: {}", e)))?;

        if parsed.cep_not_found() {
            return Err(Error::InvalidCep);
        }

        Ok(CepAddress::from(parsed))
    }
}
