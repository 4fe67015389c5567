//! History model and store abstractions.
//!
//! This crate defines the wire model for historic workflow process
//! instances and the [`HistoryStore`] capability trait that the cleanup
//! engine runs against. Concrete backends live in sibling crates:
//! `flowreap-history-rest` talks to a real engine over HTTP,
//! `flowreap-history-memory` backs tests and local development.

mod error;
mod instance;
mod store;

pub use error::HistoryError;
pub use instance::{ENGINE_TIME_FORMAT, InstanceCount, ProcessInstance};
pub use store::HistoryStore;
