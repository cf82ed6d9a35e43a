// # DigitalOcean DNS Provider
//
// This crate provides a DigitalOcean DNS provider implementation for the
// apex A-record updater.
//
// ## Constraints
//
// - One logical API operation per call (listing may span several pages)
// - Full error propagation to the updater, no retry and no backoff
// - No caching: every call reads the provider fresh
// - No explicit HTTP timeout
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - DigitalOcean API v2: https://docs.digitalocean.com/reference/api/
// - List records:  GET  `/domains/:domain/records?page=N&per_page=200`
// - Create record: POST `/domains/:domain/records`
// - Update record: PUT  `/domains/:domain/records/:record_id`

use async_trait::async_trait;
use doip_core::traits::{DnsProvider, DnsRecord, NewRecord};
use doip_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// DigitalOcean API base URL
const DIGITALOCEAN_API_BASE: &str = "https://api.digitalocean.com/v2";

/// Records requested per page when listing
const PAGE_SIZE: u32 = 200;

const PROVIDER_NAME: &str = "digitalocean";

/// DigitalOcean DNS provider
///
/// Records are addressed by domain and numeric record id. The provider
/// writes exactly what it is given; deciding whether a write is needed
/// belongs to the `Updater`.
pub struct DigitalOceanProvider {
    /// DigitalOcean API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL (overridable for tests)
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for DigitalOceanProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOceanProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// `GET /domains/:domain/records` response
#[derive(Debug, Deserialize)]
struct ListRecordsResponse {
    domain_records: Vec<DnsRecord>,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    #[serde(default)]
    pages: Option<Pages>,
}

#[derive(Debug, Default, Deserialize)]
struct Pages {
    #[serde(default)]
    next: Option<String>,
}

/// Single-record response of create and update
#[derive(Debug, Deserialize)]
struct RecordResponse {
    domain_record: DnsRecord,
}

/// Body of `PUT /domains/:domain/records/:id`
///
/// Every attribute is written back as read, so only `data` changes.
#[derive(Debug, Serialize)]
struct UpdateRecordBody<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    data: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<&'a str>,
}

impl<'a> From<&'a DnsRecord> for UpdateRecordBody<'a> {
    fn from(record: &'a DnsRecord) -> Self {
        Self {
            record_type: &record.record_type,
            name: &record.name,
            data: &record.data,
            ttl: record.ttl,
            priority: record.priority,
            port: record.port,
            weight: record.weight,
            flags: record.flags,
            tag: record.tag.as_deref(),
        }
    }
}

impl DigitalOceanProvider {
    /// Create a new DigitalOcean provider
    ///
    /// # Security
    ///
    /// The API token will NEVER be logged or displayed in error messages.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, DIGITALOCEAN_API_BASE)
    }

    /// Create a provider against a different API base URL
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("DigitalOcean API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("do-ip-updater/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn records_url(&self, domain: &str) -> String {
        format!("{}/domains/{}/records", self.base_url, domain)
    }

    /// Send a request and decode a successful JSON body
    ///
    /// Non-success statuses are mapped through [`Error::from_status`] with
    /// `context` naming the operation.
    async fn send_json<T>(&self, request: reqwest::RequestBuilder, context: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = request
            .bearer_auth(&self.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::from_status(
                PROVIDER_NAME,
                context,
                status.as_u16(),
                &error_text,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl DnsProvider for DigitalOceanProvider {
    /// List every record of the domain, following pagination
    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        let url = self.records_url(domain);
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            tracing::debug!("Listing DNS records for {} (page {})", domain, page);

            let request = self
                .client
                .get(&url)
                .query(&[("page", page), ("per_page", PAGE_SIZE)]);
            let body: ListRecordsResponse = self
                .send_json(request, &format!("list records for {}", domain))
                .await?;

            let fetched = body.domain_records.len();
            records.extend(body.domain_records);

            let has_next = body.links.pages.and_then(|p| p.next).is_some();
            if !has_next || fetched == 0 {
                break;
            }
            page += 1;
        }

        tracing::debug!("Found {} record(s) for {}", records.len(), domain);
        Ok(records)
    }

    async fn create_record(&self, domain: &str, record: &NewRecord) -> Result<DnsRecord> {
        tracing::debug!(
            "Creating DNS record in {}: {} {} {}",
            domain,
            record.name,
            record.record_type,
            record.data
        );

        let request = self.client.post(self.records_url(domain)).json(record);
        let body: RecordResponse = self
            .send_json(request, &format!("create record in {}", domain))
            .await?;

        tracing::debug!("Created record id {}", body.domain_record.id);
        Ok(body.domain_record)
    }

    async fn update_record(&self, domain: &str, record: &DnsRecord) -> Result<DnsRecord> {
        tracing::debug!(
            "Updating DNS record {} in {}: data -> {}",
            record.id,
            domain,
            record.data
        );

        let url = format!("{}/{}", self.records_url(domain), record.id);
        let request = self.client.put(url).json(&UpdateRecordBody::from(record));
        let body: RecordResponse = self
            .send_json(request, &format!("update record {} in {}", record.id, domain))
            .await?;

        Ok(body.domain_record)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
