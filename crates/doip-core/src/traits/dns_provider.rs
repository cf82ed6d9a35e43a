// # DNS Provider Trait
//
// Defines the domain-scoped record operations the updater needs.
//
// ## Implementations
//
// - DigitalOcean: `doip-provider-digitalocean` crate
//
// ## Usage
//
// ```rust,ignore
// use doip_core::{DnsProvider, NewRecord};
//
// let records = provider.list_records("example.com").await?;
// if records.is_empty() {
//     provider
//         .create_record("example.com", &NewRecord::a("@", "203.0.113.5"))
//         .await?;
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A DNS record as exposed by the provider
///
/// Only `data` is ever changed by the updater. The remaining attributes are
/// carried so that an update writes them back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned identifier, stable across updates
    pub id: u64,
    /// Record type ("A", "AAAA", "CNAME", ...)
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record name relative to the domain ("@" for the apex)
    pub name: String,
    /// Record data (an address string for "A" records)
    pub data: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub port: Option<u32>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub flags: Option<u32>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl DnsRecord {
    /// Whether this is the apex "A" record
    pub fn is_apex_a(&self) -> bool {
        self.name == "@" && self.record_type == "A"
    }
}

/// Attributes for a record to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub data: String,
}

impl NewRecord {
    /// An "A" record with the given name and address
    pub fn a(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            record_type: "A".to_string(),
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Trait for DNS provider implementations
///
/// Providers are stateless and single-shot: one logical API operation per
/// call, no retry, no caching. Deciding whether a write is needed belongs to
/// the `Updater`.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every record of `domain`
    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create a record in `domain`, returning it with its assigned id
    async fn create_record(
        &self,
        domain: &str,
        record: &NewRecord,
    ) -> Result<DnsRecord, crate::Error>;

    /// Persist `record` (matched by its id) in `domain`
    async fn update_record(
        &self,
        domain: &str,
        record: &DnsRecord,
    ) -> Result<DnsRecord, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_provider_record_with_extra_fields() {
        let json = serde_json::json!({
            "id": 3352896,
            "type": "A",
            "name": "@",
            "data": "203.0.113.5",
            "priority": null,
            "port": null,
            "ttl": 1800,
            "weight": null,
            "flags": null,
            "tag": null,
        });

        let record: DnsRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.id, 3352896);
        assert_eq!(record.ttl, Some(1800));
        assert!(record.is_apex_a());
    }

    #[test]
    fn apex_match_needs_both_name_and_type() {
        let mut record: DnsRecord = serde_json::from_value(serde_json::json!({
            "id": 1, "type": "AAAA", "name": "@", "data": "2001:db8::1",
        }))
        .unwrap();
        assert!(!record.is_apex_a());

        record.record_type = "A".to_string();
        record.name = "www".to_string();
        assert!(!record.is_apex_a());
    }

    #[test]
    fn new_record_serializes_type_field() {
        let value = serde_json::to_value(NewRecord::a("@", "198.51.100.2")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "type": "A", "name": "@", "data": "198.51.100.2" })
        );
    }
}
