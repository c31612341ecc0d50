//! Record sources for the staking ledger.
//!
//! Provides two [`sb_core::RecordSource`] implementations:
//! - [`RpcLedger`]: reads the staking contract over JSON-RPC `eth_call`
//! - [`SnapshotSource`]: serves a ledger snapshot stored as JSON

pub mod contract;
mod rpc;
mod snapshot;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use sb_core::SourceError;

pub use rpc::RpcLedger;
pub use snapshot::{Snapshot, SnapshotEntity, SnapshotItem, SnapshotSource};

/// Ledger access errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The endpoint URL was unusable.
    #[error("invalid endpoint: {reason}")]
    InvalidEndpoint { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The node answered with a JSON-RPC error.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// Failed to parse the response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// An address was not 20 bytes of hex.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// Failed to decode contract return data.
    #[error("ABI decode failed: {0}")]
    Decode(#[from] alloy::sol_types::Error),
    /// Failed to read a snapshot file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A snapshot file was not valid.
    #[error("invalid snapshot: {0}")]
    Snapshot(String),
}

impl LedgerError {
    /// Classifies this error for the core, naming the failed operation.
    pub fn into_source_error(self, operation: &'static str) -> SourceError {
        match self {
            Self::Request(err) => SourceError::Unreachable(format!("{operation}: {err}")),
            Self::Io { .. } => SourceError::Unreachable(format!("{operation}: {self}")),
            Self::Rpc { .. } => SourceError::Rejected {
                operation,
                message: self.to_string(),
            },
            Self::InvalidEndpoint { .. }
            | Self::ClientBuild(_)
            | Self::InvalidResponse(_)
            | Self::InvalidAddress(_)
            | Self::Decode(_)
            | Self::Snapshot(_) => SourceError::Malformed {
                operation,
                message: self.to_string(),
            },
        }
    }
}

/// Source of "now" for elapsed-time calculations.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Current unix time in seconds.
    fn now(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock stopped at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}
