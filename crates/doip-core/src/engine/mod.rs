//! Core updater
//!
//! The Updater is responsible for:
//! - Resolving the current public IP via IpLookup
//! - Checking the address shape
//! - Locating the apex "A" record via DnsProvider
//! - Creating or updating that record when needed
//!
//! ## Pass Flow
//!
//! ```text
//! ┌─────────────┐   ip    ┌──────────┐  ok   ┌──────────────┐
//! │  IpLookup   │───────▶│ validate │──────▶│ list_records │
//! └─────────────┘         └──────────┘       └──────────────┘
//!                                                    │
//!                     ┌──────────────────────────────┼──────────────────┐
//!                     ▼                              ▼                  ▼
//!              ┌──────────────┐             ┌──────────────┐     ┌───────────┐
//!              │ create_record│             │ update_record│     │ unchanged │
//!              │ (no record)  │             │ (data stale) │     │           │
//!              └──────────────┘             └──────────────┘     └───────────┘
//! ```
//!
//! Lookup, validation and write failures are logged and reported as a
//! [`PassOutcome`]. A failure to list records is returned as `Err` from
//! [`Updater::run_pass`]; [`Updater::run`] logs it and keeps polling.

use crate::config::UpdaterConfig;
use crate::error::{Error, Result};
use crate::schedule::PollSchedule;
use crate::traits::{DnsProvider, DnsRecord, IpLookup, NewRecord};
use crate::validate::is_dotted_quad;
use tracing::{debug, error, info};

/// Name of the managed record
pub const APEX_NAME: &str = "@";

/// Type of the managed record
pub const RECORD_TYPE: &str = "A";

/// What a single pass did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// No apex record existed; one was created
    Created {
        record_id: u64,
        ip: String,
    },

    /// The apex record held a different address and was updated in place
    Updated {
        record_id: u64,
        previous: String,
        current: String,
    },

    /// The apex record already held the current address
    Unchanged {
        record_id: u64,
        ip: String,
    },

    /// The IP lookup failed; no DNS calls were made
    LookupFailed {
        error: String,
    },

    /// The resolved address did not look like a dotted quad
    InvalidAddress {
        value: String,
    },

    /// Creating or updating the record failed
    WriteFailed {
        ip: String,
        error: String,
    },
}

impl PassOutcome {
    /// Whether the pass wrote to the provider
    pub fn wrote(&self) -> bool {
        matches!(self, PassOutcome::Created { .. } | PassOutcome::Updated { .. })
    }
}

/// Keeps the apex "A" record of one domain pointed at the current public IP
///
/// ## Lifecycle
///
/// 1. Create with [`Updater::new()`]
/// 2. Call [`Updater::run()`] with a schedule, or [`Updater::run_pass()`]
///    for a single reconciliation
///
/// No state is kept between passes: the provider is the only source of
/// truth and is read fresh every time.
pub struct Updater {
    /// Resolves the current public IP
    ip_lookup: Box<dyn IpLookup>,

    /// Reads and writes DNS records
    provider: Box<dyn DnsProvider>,

    /// Domain whose apex record is managed
    domain: String,
}

impl Updater {
    /// Create a new updater for the domain in `config`
    pub fn new(
        ip_lookup: Box<dyn IpLookup>,
        provider: Box<dyn DnsProvider>,
        config: &UpdaterConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_lookup,
            provider,
            domain: config.domain.clone(),
        })
    }

    /// Run passes until the schedule says stop
    ///
    /// Each pass runs to completion before the schedule is consulted, so
    /// passes never overlap. Returns the number of passes run.
    pub async fn run(&self, schedule: &mut dyn PollSchedule) -> usize {
        let mut passes = 0;
        loop {
            passes += 1;
            if let Err(e) = self.run_pass().await {
                error!("Pass aborted: {}", e);
            }

            if !schedule.wait().await {
                debug!("Schedule finished after {} pass(es)", passes);
                return passes;
            }
        }
    }

    /// Run one reconciliation pass
    ///
    /// # Returns
    ///
    /// - `Ok(PassOutcome)`: the pass completed, possibly with a logged failure
    /// - `Err(Error)`: listing the domain's records failed
    pub async fn run_pass(&self) -> Result<PassOutcome> {
        info!("Update started");

        let ip = match self.resolve_ip().await {
            Ok(ip) => ip,
            Err(Error::InvalidAddress(value)) => {
                error!("{} is not a valid IP", value);
                return Ok(PassOutcome::InvalidAddress { value });
            }
            Err(e) => {
                error!("{}", e);
                return Ok(PassOutcome::LookupFailed {
                    error: e.to_string(),
                });
            }
        };
        info!("Attempting to set IP address {}", ip);

        let existing = self.find_apex_record().await?;
        let record_string = format!("{}:{}:{}:{}", self.domain, APEX_NAME, RECORD_TYPE, ip);

        match existing {
            Some(record) if record.data != ip => {
                let previous = record.data.clone();
                match self.write_address(record, &ip).await {
                    Ok(updated) => {
                        info!("Successfully updated {}", record_string);
                        Ok(PassOutcome::Updated {
                            record_id: updated.id,
                            previous,
                            current: ip,
                        })
                    }
                    Err(e) => {
                        error!("{}", e);
                        Ok(PassOutcome::WriteFailed {
                            ip,
                            error: e.to_string(),
                        })
                    }
                }
            }
            Some(record) => {
                info!("No update needed");
                Ok(PassOutcome::Unchanged {
                    record_id: record.id,
                    ip,
                })
            }
            None => {
                let new_record = NewRecord::a(APEX_NAME, ip.as_str());
                match self.provider.create_record(&self.domain, &new_record).await {
                    Ok(created) => {
                        info!("Successfully created {}", record_string);
                        Ok(PassOutcome::Created {
                            record_id: created.id,
                            ip,
                        })
                    }
                    Err(e) => {
                        error!("{}", e);
                        Ok(PassOutcome::WriteFailed {
                            ip,
                            error: e.to_string(),
                        })
                    }
                }
            }
        }
    }

    /// Look up the public IP and check its shape
    async fn resolve_ip(&self) -> Result<String> {
        let details = self.ip_lookup.current_details().await.map_err(|e| match e {
            Error::IpLookup(_) => e,
            other => Error::ip_lookup(format!(
                "{} lookup failed: {}",
                self.ip_lookup.service_name(),
                other
            )),
        })?;

        debug!(
            "Lookup via {}: ip={} hostname={:?} city={:?} region={:?} country={:?} org={:?}",
            self.ip_lookup.service_name(),
            details.ip,
            details.hostname,
            details.city,
            details.region,
            details.country,
            details.org
        );

        if !is_dotted_quad(&details.ip) {
            return Err(Error::invalid_address(details.ip));
        }
        Ok(details.ip)
    }

    /// First record of the domain named "@" with type "A"
    async fn find_apex_record(&self) -> Result<Option<DnsRecord>> {
        let records = self.provider.list_records(&self.domain).await?;
        debug!(
            "{} returned {} record(s) for {}",
            self.provider.provider_name(),
            records.len(),
            self.domain
        );
        Ok(records.into_iter().find(DnsRecord::is_apex_a))
    }

    /// Replace the record's data and persist it under the same id
    async fn write_address(&self, mut record: DnsRecord, ip: &str) -> Result<DnsRecord> {
        record.data = ip.to_string();
        self.provider.update_record(&self.domain, &record).await
    }
}
