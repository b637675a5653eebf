//! Error types for store operations.
//!
//! Validation and not-found conditions are always surfaced to the
//! caller; only allocation exhaustion is treated as exceptional, and
//! even that leaves the store unchanged.

use std::time::Duration;

use thiserror::Error;

use crate::kv_store::KvStore;

/// All failures a store operation can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key length is zero or exceeds the configured maximum.
    #[error("key length {len} outside [1, {max}]")]
    KeyLength {
        /// Length of the rejected key.
        len: usize,
        /// Configured maximum key length at the time of the call.
        max: usize,
    },

    /// Value length is zero or exceeds the configured maximum.
    #[error("value length {len} outside [1, {max}]")]
    ValueLength {
        /// Length of the rejected value.
        len: usize,
        /// Configured maximum value length at the time of the call.
        max: usize,
    },

    /// A configured bound must be at least 1.
    #[error("configured bound must be at least 1")]
    InvalidBound,

    /// Delete target key is absent.
    #[error("key not found")]
    NotFound,

    /// The store lock was still held after the single sleep-and-retry
    /// window. Retrying the whole operation is the caller's decision.
    #[error("store lock still held after waiting {waited:?}")]
    LockContended {
        /// The fixed interval slept between the two acquisition attempts.
        waited: Duration,
    },

    /// Entry storage could not be reserved. The store is unchanged; no
    /// partial entry is left behind.
    #[error("could not reserve {bytes} bytes of entry storage")]
    AllocationFailed {
        /// Number of bytes the failed reservation asked for.
        bytes: usize,
    },
}

impl StoreError {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }

    /// Check if this error may succeed on retry.
    ///
    /// Only lock contention is transient; validation failures and
    /// missing keys will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::LockContended { .. })
    }

    /// Check if this is a key or value length rejection.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::KeyLength { .. }
                | StoreError::ValueLength { .. }
                | StoreError::InvalidBound
        )
    }
}

/// A failed [`KvStore::discard`].
///
/// Carries the un-discarded handle back to the caller, so the holder
/// count stays accurate and the caller owns the retry policy instead
/// of the store spinning on a contended lock.
#[derive(Debug, Error)]
#[error("store not discarded: {source}")]
pub struct DiscardError {
    /// The handle, still a live holder.
    pub store: KvStore,
    /// Why the discard did not happen.
    #[source]
    pub source: StoreError,
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
