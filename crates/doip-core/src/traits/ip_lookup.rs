// # IP Lookup Trait
//
// Defines the interface for resolving the caller's public IP address.
//
// ## Implementations
//
// - ipinfo.io: `doip-ip-ipinfo` crate
//
// ## Usage
//
// ```rust,ignore
// use doip_core::IpLookup;
//
// let details = lookup.current_details().await?;
// println!("public address: {}", details.ip);
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Details returned by an IP lookup service
///
/// `ip` is kept as the raw string the service returned. The updater checks
/// its shape and writes exactly this string to the DNS record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpDetails {
    /// The public address as reported by the service
    pub ip: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub org: Option<String>,
}

impl IpDetails {
    /// Details carrying only an address
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            hostname: None,
            city: None,
            region: None,
            country: None,
            org: None,
        }
    }
}

/// Trait for IP lookup implementations
///
/// # Contract
///
/// - One lookup per call, no retries and no caching between calls
/// - Any failure (network, status, malformed body, missing `ip`) is an `Err`
#[async_trait]
pub trait IpLookup: Send + Sync {
    /// Get details about the current public IP
    async fn current_details(&self) -> Result<IpDetails, crate::Error>;

    /// Get the lookup service name (for logging)
    fn service_name(&self) -> &'static str;
}
