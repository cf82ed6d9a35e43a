//! Collaborator traits
//!
//! This module defines the abstract interfaces the updater talks to.
//!
//! - [`IpLookup`]: Resolve the caller's current public IP
//! - [`DnsProvider`]: List, create and update DNS records for a domain

pub mod dns_provider;
pub mod ip_lookup;

pub use dns_provider::{DnsProvider, DnsRecord, NewRecord};
pub use ip_lookup::{IpDetails, IpLookup};
