//! KvStore: the public reference-counted handle.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::{ConfigOption, StoreConfig};
use crate::entry_list::copy_bytes;
use crate::error::{DiscardError, Result, StoreError};
use crate::shared::Shared;

/// A handle to a bounded, in-memory key/value store.
///
/// Handles are how the store is shared: every handle minted by
/// [`dup`](KvStore::dup) counts as one holder, and the store's entries
/// live exactly as long as at least one holder does. `KvStore` does
/// not implement `Clone`; duplication is explicit and goes through the
/// store lock so the holder count stays consistent with concurrent
/// discards.
///
/// All operations, reads included, serialize on one internal lock with
/// a bounded wait: one non-blocking attempt, one fixed sleep
/// (`lock_wait`, 10ms by default), one final attempt. An operation that
/// loses both attempts returns [`StoreError::LockContended`] instead of
/// blocking; nothing in this crate waits unboundedly.
pub struct KvStore {
    shared: Arc<Shared>,
    /// Set by `discard` so `Drop` does not decrement a second time.
    discarded: bool,
}

impl KvStore {
    /// Create an empty store with default bounds (4096-byte keys and
    /// values) and the default 10ms lock wait. The new handle is the
    /// sole holder.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store with explicit configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new(config)),
            discarded: false,
        }
    }

    /// Mint another handle to the same store, incrementing the holder
    /// count under the lock.
    pub fn dup(&self) -> Result<KvStore> {
        let mut state = self.shared.acquire()?;
        state.add_holder();
        drop(state);
        Ok(KvStore {
            shared: Arc::clone(&self.shared),
            discarded: false,
        })
    }

    /// Give up this handle. When the last holder discards, every entry
    /// is released; earlier discards leave the surviving holders fully
    /// usable and touch no entries.
    ///
    /// On lock contention the handle comes back inside the error, still
    /// counted as a holder, and the caller decides whether to retry.
    /// Teardown never spins: at most one sleep, then the error.
    pub fn discard(mut self) -> std::result::Result<(), DiscardError> {
        let source = match self.shared.acquire() {
            Ok(mut state) => {
                if state.remove_holder() {
                    debug!(entries = state.entries.len(), "last holder gone; releasing entries");
                    state.entries.clear();
                }
                drop(state);
                self.discarded = true;
                return Ok(());
            }
            Err(source) => source,
        };
        Err(DiscardError { store: self, source })
    }

    /// Change a bound. Takes effect for subsequent `set` calls only;
    /// entries already stored are never revalidated or resized.
    pub fn configure(&self, option: ConfigOption) -> Result<()> {
        let value = match option {
            ConfigOption::MaxKeyLen(v) | ConfigOption::MaxValLen(v) => v,
        };
        if value == 0 {
            return Err(StoreError::InvalidBound);
        }
        let mut state = self.shared.acquire()?;
        match option {
            ConfigOption::MaxKeyLen(v) => state.max_key_len = v,
            ConfigOption::MaxValLen(v) => state.max_val_len = v,
        }
        Ok(())
    }

    /// Store `value` under `key`.
    ///
    /// An existing entry has its value replaced in place (only the new
    /// value's length is validated); otherwise both lengths are
    /// validated and a new entry is inserted at the front of the list.
    /// Validation and allocation failures leave the store unchanged;
    /// no partial entry is ever left behind.
    pub fn set(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        let key = key.as_ref();
        let value = value.as_ref();
        let mut state = self.shared.acquire()?;

        let max_val = state.max_val_len;
        if let Some(idx) = state.entries.position(key) {
            if !(1..=max_val).contains(&value.len()) {
                return Err(StoreError::ValueLength {
                    len: value.len(),
                    max: max_val,
                });
            }
            let copied = copy_bytes(value)?;
            trace!(key_len = key.len(), val_len = value.len(), "replacing value in place");
            state.entries.replace_at(idx, copied);
            return Ok(());
        }

        let max_key = state.max_key_len;
        if !(1..=max_key).contains(&key.len()) {
            return Err(StoreError::KeyLength {
                len: key.len(),
                max: max_key,
            });
        }
        if !(1..=max_val).contains(&value.len()) {
            return Err(StoreError::ValueLength {
                len: value.len(),
                max: max_val,
            });
        }
        let key = copy_bytes(key)?;
        let value = copy_bytes(value)?;
        state.entries.push_front(key, value)
    }

    /// Look up `key`, returning a copy of its value or `Ok(None)` when
    /// absent.
    ///
    /// Reads take the same bounded-wait lock as writers, so a read
    /// racing an update sees either the old value or the new one in
    /// full, never a torn buffer. The cost is that `LockContended` is
    /// possible here too.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Option<Vec<u8>>> {
        let state = self.shared.acquire()?;
        Ok(state.entries.get(key.as_ref()).map(|v| v.to_vec()))
    }

    /// Remove the entry under `key`, releasing its storage. An absent
    /// key is an error ([`StoreError::NotFound`]), distinct from
    /// success, so found-and-removed is always distinguishable.
    pub fn del(&self, key: impl AsRef<[u8]>) -> Result<()> {
        let mut state = self.shared.acquire()?;
        if state.entries.remove(key.as_ref()) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> Result<usize> {
        let state = self.shared.acquire()?;
        Ok(state.entries.len())
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> Result<bool> {
        let state = self.shared.acquire()?;
        Ok(state.entries.is_empty())
    }

    /// Whether `key` is present, without copying its value.
    pub fn contains(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        let state = self.shared.acquire()?;
        Ok(state.entries.position(key.as_ref()).is_some())
    }

    /// Current holder count. Diagnostic; the value may be stale by the
    /// time the caller looks at it if other holders dup or discard
    /// concurrently.
    pub fn holders(&self) -> Result<usize> {
        let state = self.shared.acquire()?;
        Ok(state.holders)
    }
}

impl Default for KvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for KvStore {
    /// Implicit discard for handles dropped without [`KvStore::discard`].
    ///
    /// One bounded lock attempt. If even that fails, the logical
    /// decrement is abandoned with a warning: the backing allocation is
    /// still reclaimed through `Arc` ownership once the last handle
    /// drops, so the worst case is a stale holder count on a store that
    /// is about to disappear, never a leak or a double free.
    fn drop(&mut self) {
        if self.discarded {
            return;
        }
        match self.shared.acquire() {
            Ok(mut state) => {
                if state.remove_holder() {
                    debug!(entries = state.entries.len(), "last holder dropped; releasing entries");
                    state.entries.clear();
                }
            }
            Err(_) => {
                warn!("handle dropped while store lock held; holder count left stale");
            }
        }
    }
}

impl fmt::Debug for KvStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvStore").finish_non_exhaustive()
    }
}
