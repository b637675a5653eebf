//! Construction-time configuration and runtime options.
//!
//! Defaults live here instead of file-scope mutable state: every store
//! gets its own copy at construction, and later changes go through
//! [`ConfigOption`], a closed set: there is no "unknown option"
//! runtime value to silently ignore.

use std::time::Duration;

/// Default maximum key length in bytes.
pub const DEFAULT_MAX_KEY_LEN: usize = 4096;
/// Default maximum value length in bytes.
pub const DEFAULT_MAX_VAL_LEN: usize = 4096;
/// Default interval slept between the two lock acquisition attempts.
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_millis(10);

/// Per-store configuration applied at construction.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Accepted key lengths are `[1, max_key_len]`.
    pub max_key_len: usize,
    /// Accepted value lengths are `[1, max_val_len]`.
    pub max_val_len: usize,
    /// Fixed sleep used by the bounded lock retry. Immutable after
    /// construction.
    pub lock_wait: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_key_len: DEFAULT_MAX_KEY_LEN,
            max_val_len: DEFAULT_MAX_VAL_LEN,
            lock_wait: DEFAULT_LOCK_WAIT,
        }
    }
}

/// A reconfigurable store option with its new value.
///
/// Bounds apply to subsequent `set` calls only; entries already stored
/// are never revalidated or resized.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigOption {
    /// Replace the maximum accepted key length.
    MaxKeyLen(usize),
    /// Replace the maximum accepted value length.
    MaxValLen(usize),
}
