// # ipinfo.io IP Lookup
//
// This crate provides an `IpLookup` backed by the ipinfo.io API.
//
// ## API Reference
//
// - `GET https://ipinfo.io/json`
// - `Authorization: Bearer <token>` when a token is configured; without one
//   the free anonymous quota applies
//
// The response is a JSON object with at least an `ip` field:
//
// ```json
// { "ip": "203.0.113.5", "city": "Amsterdam", "country": "NL", "org": "AS14061 DigitalOcean, LLC" }
// ```
//
// ## Constraints
//
// - One request per call, no retry, no caching
// - No explicit timeout: a stalled request delays the pass
// - The token never appears in logs or `Debug` output

use async_trait::async_trait;
use doip_core::traits::{IpDetails, IpLookup};
use doip_core::{Error, Result};

/// ipinfo.io API base URL
const IPINFO_API_BASE: &str = "https://ipinfo.io";

const SERVICE_NAME: &str = "ipinfo";

/// ipinfo.io lookup client
pub struct IpInfoLookup {
    /// ipinfo.io token
    /// ⚠️ NEVER log this value
    token: Option<String>,

    /// API base URL (overridable for tests)
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

// Custom Debug implementation that hides the token
impl std::fmt::Debug for IpInfoLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpInfoLookup")
            .field("token", &self.token.as_ref().map(|_| "<REDACTED>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl IpInfoLookup {
    /// Create a lookup client
    ///
    /// An empty token is treated as no token.
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, IPINFO_API_BASE)
    }

    /// Create a lookup client against a different base URL
    pub fn with_base_url(token: Option<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("do-ip-updater/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            token: token.filter(|t| !t.is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Whether requests are authenticated
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    async fn fetch_details(&self) -> Result<IpDetails> {
        let url = format!("{}/json", self.base_url);
        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::ip_lookup(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::from_status(
                SERVICE_NAME,
                "IP lookup",
                status.as_u16(),
                &error_text,
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_lookup(format!("Failed to read response: {}", e)))?;

        // The address is passed on verbatim; the updater decides whether it is usable
        serde_json::from_str(&body)
            .map_err(|e| Error::ip_lookup(format!("Malformed response: {}", e)))
    }
}

#[async_trait]
impl IpLookup for IpInfoLookup {
    async fn current_details(&self) -> Result<IpDetails> {
        tracing::debug!(
            "Querying {} for the public IP (authenticated: {})",
            SERVICE_NAME,
            self.has_token()
        );
        self.fetch_details().await
    }

    fn service_name(&self) -> &'static str {
        SERVICE_NAME
    }
}
