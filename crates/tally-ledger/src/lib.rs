//! Core ledger engine for Tally.
//!
//! This crate is the heart of the system. It provides:
//! - Content-addressed entry derivation (the entry factory)
//! - The [`Ledger`] engine: pending-entry buffering, windowed block sealing,
//!   block hash chaining, and store orchestration
//! - [`InclusionProof`] generation and verification
//! - Lazy, filtered queries over committed history
//!
//! The engine owns a pending buffer and a window-start marker; everything
//! else it touches is immutable once sealed. A single `Ledger` instance is a
//! single logical writer — writers take `&mut self`, so sharing one ledger
//! across threads means wrapping it in a `Mutex`, which makes the
//! append-then-maybe-seal sequence one critical section.

pub mod engine;
pub mod error;
pub mod factory;
pub mod proof;
pub mod query;

pub use engine::{AppendOptions, Ledger, LedgerConfig, SealOrder, TICKS_PER_BLOCK};
pub use error::LedgerError;
pub use factory::{derive_entry, verify_entry_id};
pub use proof::InclusionProof;
pub use query::{EntryFilter, EntryIter};
