//! Ledger-side organization registration.
//!
//! An organization registers itself by writing a single marker to the ledger
//! under the key `<org>#<timestamp>`, with the timestamp as the value. The
//! ledger is reached through the [`LedgerStub`] capability so the contract
//! logic does not depend on any particular peer runtime.

use chrono::{DateTime, Timelike, Utc};
use log::info;
use std::collections::BTreeMap;

/// Separator between organization name and timestamp in registration keys
pub const KEY_SEPARATOR: char = '#';

/// Failure reported by the ledger when writing state
#[derive(Debug, thiserror::Error)]
#[error("ledger write failed: {0}")]
pub struct LedgerError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// State-write capability handed to the contract by the peer
pub trait LedgerStub {
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError>;
}

/// In-memory ledger, ordered by key
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    state: BTreeMap<String, Vec<u8>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Keys registered for `org`, oldest first
    pub fn registrations(&self, org: &str) -> Vec<&str> {
        let prefix = format!("{}{}", org, KEY_SEPARATOR);
        self.state
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }
}

impl LedgerStub for MemoryLedger {
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.state.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Format a registration timestamp as `YYYY-MM-DDTHH:MM:SS[.fff]Z`.
///
/// Milliseconds are printed without trailing zeros and left out when zero.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    let mut ts = at.format("%Y-%m-%dT%H:%M:%S").to_string();
    let millis = at.nanosecond() % 1_000_000_000 / 1_000_000;
    if millis > 0 {
        let fraction = format!("{:03}", millis);
        ts.push('.');
        ts.push_str(fraction.trim_end_matches('0'));
    }
    ts.push('Z');
    ts
}

/// The registration contract
#[derive(Debug, Default, Clone, Copy)]
pub struct Registration;

impl Registration {
    /// Record that `org` registered now; returns the key written
    pub fn register<S: LedgerStub + ?Sized>(
        &self,
        stub: &mut S,
        org: &str,
    ) -> Result<String, RegistrationError> {
        self.register_at(stub, org, Utc::now())
    }

    /// Record that `org` registered at `at`; returns the key written
    pub fn register_at<S: LedgerStub + ?Sized>(
        &self,
        stub: &mut S,
        org: &str,
        at: DateTime<Utc>,
    ) -> Result<String, RegistrationError> {
        if org.is_empty() {
            return Err(RegistrationError::Validation(
                "organization name cannot be empty".to_string(),
            ));
        }
        let ts = format_timestamp(&at);
        let key = format!("{}{}{}", org, KEY_SEPARATOR, ts);
        stub.put_state(&key, ts.as_bytes())?;
        info!("Registered {} at {}", org, ts);
        Ok(key)
    }
}
