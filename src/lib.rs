//! rc-kvstore: a bounded, in-memory key/value store behind
//! reference-counted handles, with a bounded-wait locking discipline.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: build KvStore in small, verifiable layers so each piece can
//!   be reasoned about independently.
//! - Layers:
//!   - EntryList: structural layer, an ordered collection of owned
//!     byte-string entries with linear, exact (length-sensitive,
//!     byte-for-byte) key matching and front insertion. Knows nothing
//!     about locking or bounds.
//!   - Shared: the single mutex guarding everything mutable (entries,
//!     holder count, size bounds), plus the bounded acquisition
//!     protocol: one try, one fixed sleep, one final try.
//!   - KvStore: public handle API: lifecycle (`new`/`dup`/`discard`),
//!     configuration, and the associative operations
//!     (`set`/`get`/`del`/`len`).
//!
//! Constraints
//! - Keys and values are byte strings with lengths in `[1, bound]`;
//!   bounds default to 4096 and are per-store, set at construction and
//!   adjustable through a closed option set.
//! - Keys are unique among live entries; lookup is a linear scan by
//!   design (no hash index), so the complexity class and ordering
//!   behavior stay those of a simple list.
//! - No operation blocks unboundedly. Lock acquisition is at most one
//!   sleep (`lock_wait`, default 10ms) long; contention past that
//!   surfaces as [`StoreError::LockContended`] for the caller to
//!   handle.
//! - Holder counting is explicit: `dup` is the only way to mint a
//!   handle and `discard` the orderly way to give one up. `KvStore`
//!   does not implement `Clone`. Dropping a handle without `discard`
//!   runs a best-effort implicit discard.
//!
//! Why this split?
//! - Localize invariants: the structural layer owns uniqueness and
//!   exact matching, the shared layer owns serialization and the
//!   holder count, the handle layer owns validation and lifecycle.
//! - No unsafe: storage is owned top to bottom, so teardown at
//!   holder-count zero is a `clear`, not a hand-rolled free chain.
//! - Clear failure boundaries: every error is produced before any
//!   mutation, and the lock releases on every exit path by guard drop.
//!
//! Consistency
//! - Reads (`get`/`len`/`contains`) take the same lock as writers.
//!   They can therefore report contention, but can never observe a
//!   torn value or a freed buffer.
//!
//! Notes and non-goals
//! - No persistence or wire protocol; no multi-key transactions.
//! - No iteration API beyond the entry count; insertion order (newest
//!   first) is an internal property, not a contract.
//! - Overflow of the holder counter aborts, matching `Rc` semantics,
//!   rather than wrapping into premature teardown.

mod config;
mod entry_list;
mod entry_list_proptest;
mod error;
mod kv_store;
mod shared;

// Public surface
pub use config::{
    ConfigOption, StoreConfig, DEFAULT_LOCK_WAIT, DEFAULT_MAX_KEY_LEN, DEFAULT_MAX_VAL_LEN,
};
pub use error::{DiscardError, Result, StoreError};
pub use kv_store::KvStore;
