// # doip-core
//
// Core library for the DigitalOcean apex "A" record updater.
//
// ## Architecture Overview
//
// - **IpLookup**: Trait for resolving the caller's current public IP
// - **DnsProvider**: Trait for listing, creating and updating DNS records
// - **Updater**: One reconciliation pass (lookup → validate → locate → reconcile)
//   and the polling driver that repeats it
// - **PollSchedule**: The suspension point between passes
//
// ## Design Principles
//
// 1. **Explicit configuration**: `UpdaterConfig` is built once and passed in
// 2. **Explicit results**: every step returns a `Result`, the pass branches on it
// 3. **Library-First**: the daemon is a thin wrapper around this crate
// 4. **Idempotency**: the provider is only written when the address differs

pub mod config;
pub mod engine;
pub mod error;
pub mod schedule;
pub mod traits;
pub mod validate;

// Re-export core types for convenience
pub use config::{DEFAULT_POLL_INTERVAL_SECS, LogLevel, UpdaterConfig};
pub use engine::{PassOutcome, Updater};
pub use error::{Error, Result};
pub use schedule::{FixedInterval, LimitedSchedule, PollSchedule};
pub use traits::{DnsProvider, DnsRecord, IpDetails, IpLookup, NewRecord};
