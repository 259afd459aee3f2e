//! Input fingerprints
//!
//! `data_version` hashes an input snapshot so callers that add a result
//! cache can key it on `(tenant_id, window, data_version)`. Row order does
//! not affect the version. The engine itself never caches.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::{CustomerTransaction, LedgerEntry};

/// Rows that can contribute to a data version
pub trait Fingerprint {
    fn feed(&self, hasher: &mut Sha256);
}

impl Fingerprint for CustomerTransaction {
    fn feed(&self, hasher: &mut Sha256) {
        hasher.update(self.customer_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.date.to_string().as_bytes());
        hasher.update(self.amount.to_be_bytes());
    }
}

impl Fingerprint for LedgerEntry {
    fn feed(&self, hasher: &mut Sha256) {
        hasher.update(self.date.to_string().as_bytes());
        hasher.update(self.amount.to_be_bytes());
    }
}

/// Order-independent hex SHA-256 over `rows`
pub fn data_version<T: Fingerprint>(rows: &[T]) -> String {
    let mut digests: Vec<Vec<u8>> = rows
        .iter()
        .map(|row| {
            let mut hasher = Sha256::new();
            row.feed(&mut hasher);
            hasher.finalize().to_vec()
        })
        .collect();
    digests.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update((digests.len() as u64).to_be_bytes());
    for digest in &digests {
        hasher.update(digest);
    }
    hex::encode(hasher.finalize())
}

/// Cache key for one analysis request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisKey {
    pub tenant_id: String,
    /// Window parameters, e.g. `rfm:365d@2024-06-30` or `forecast:12m@2024-06`
    pub window: String,
    pub data_version: String,
}

impl AnalysisKey {
    pub fn new(tenant_id: impl Into<String>, window: impl Into<String>, data_version: String) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            window: window.into(),
            data_version,
        }
    }
}

impl std::fmt::Display for AnalysisKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.tenant_id, self.window, self.data_version)
    }
}
