//! Test doubles and common utilities for updater contract tests
//!
//! The doubles record every call so tests can assert on exactly which
//! provider operations a pass performed.

#![allow(dead_code)]

use doip_core::error::{Error, Result};
use doip_core::traits::{DnsProvider, DnsRecord, IpDetails, IpLookup, NewRecord};
use doip_core::UpdaterConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpLookup that returns a fixed address (or a fixed failure)
pub struct StaticIpLookup {
    ip: Option<String>,
    call_count: Arc<AtomicUsize>,
}

impl StaticIpLookup {
    pub fn returning(ip: &str) -> Self {
        Self {
            ip: Some(ip.to_string()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            ip: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait::async_trait]
impl IpLookup for StaticIpLookup {
    async fn current_details(&self) -> Result<IpDetails> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match &self.ip {
            Some(ip) => Ok(IpDetails::new(ip.clone())),
            None => Err(Error::http("connection refused")),
        }
    }

    fn service_name(&self) -> &'static str {
        "static"
    }
}

/// A provider operation as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    List { domain: String },
    Create { domain: String, record: NewRecord },
    Update { domain: String, id: u64, data: String },
}

/// Shared view of the mock's call log and stored records
#[derive(Clone, Default)]
pub struct ProviderHandle {
    calls: Arc<Mutex<Vec<ProviderCall>>>,
    records: Arc<Mutex<Vec<DnsRecord>>>,
}

impl ProviderHandle {
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn write_calls(&self) -> Vec<ProviderCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, ProviderCall::List { .. }))
            .collect()
    }

    pub fn records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }
}

/// An in-memory DnsProvider that records calls
pub struct MockDnsProvider {
    handle: ProviderHandle,
    fail_list: bool,
    fail_writes: bool,
    next_id: AtomicUsize,
}

impl MockDnsProvider {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        let handle = ProviderHandle::default();
        *handle.records.lock().unwrap() = records;
        Self {
            handle,
            fail_list: false,
            fail_writes: false,
            next_id: AtomicUsize::new(9000),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn handle(&self) -> ProviderHandle {
        self.handle.clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        self.handle.calls.lock().unwrap().push(ProviderCall::List {
            domain: domain.to_string(),
        });
        if self.fail_list {
            return Err(Error::provider("mock", "list unavailable"));
        }
        Ok(self.handle.records())
    }

    async fn create_record(&self, domain: &str, record: &NewRecord) -> Result<DnsRecord> {
        self.handle.calls.lock().unwrap().push(ProviderCall::Create {
            domain: domain.to_string(),
            record: record.clone(),
        });
        if self.fail_writes {
            return Err(Error::provider("mock", "create rejected"));
        }

        let created = DnsRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) as u64,
            record_type: record.record_type.clone(),
            name: record.name.clone(),
            data: record.data.clone(),
            ttl: Some(1800),
            priority: None,
            port: None,
            weight: None,
            flags: None,
            tag: None,
        };
        self.handle.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_record(&self, domain: &str, record: &DnsRecord) -> Result<DnsRecord> {
        self.handle.calls.lock().unwrap().push(ProviderCall::Update {
            domain: domain.to_string(),
            id: record.id,
            data: record.data.clone(),
        });
        if self.fail_writes {
            return Err(Error::provider("mock", "update rejected"));
        }

        let mut records = self.handle.records.lock().unwrap();
        let stored = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| Error::not_found(format!("record {}", record.id)))?;
        *stored = record.clone();
        Ok(record.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A record with the given identity and data
pub fn record(id: u64, record_type: &str, name: &str, data: &str) -> DnsRecord {
    DnsRecord {
        id,
        record_type: record_type.to_string(),
        name: name.to_string(),
        data: data.to_string(),
        ttl: Some(3600),
        priority: None,
        port: None,
        weight: None,
        flags: None,
        tag: None,
    }
}

/// Helper to create a minimal UpdaterConfig for testing
pub fn minimal_config(domain: &str) -> UpdaterConfig {
    UpdaterConfig::new("test-token", domain).with_poll_interval_secs(1)
}
