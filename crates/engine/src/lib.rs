//! Batched history cleanup engine.
//!
//! [`run_cleanup_pass`] deletes all finished workflow history records
//! older than a configured threshold, in pages of a configured size,
//! without ever loading the full history set into memory. Two
//! eligibility strategies are supported:
//!
//! - [`FilterStrategy::ServerSide`]: each page request carries a
//!   `finished before` cutoff, so every returned record is eligible by
//!   construction. The pass ends when a page comes back shorter than
//!   the batch size.
//! - [`FilterStrategy::ClientSide`]: pages are fetched unfiltered
//!   (sorted ascending by end time) and scanned locally. Because of the
//!   sort order, the first record younger than the threshold proves
//!   everything after it is too young as well, ending the pass.
//!
//! Pages are always requested at offset 0: eligible records are deleted
//! as they are found, so the next page's first candidate is always the
//! new offset-0 record. This sidesteps rank-shift bugs that explicit
//! offset bookkeeping would invite.
//!
//! The engine issues store calls strictly sequentially and holds no
//! state across passes; the store is the only durable state. Running
//! at most one pass at a time is the caller's responsibility.

mod config;
mod error;
mod pass;

pub use config::{CleanupConfig, FilterStrategy};
pub use error::CleanupError;
pub use pass::run_cleanup_pass;
