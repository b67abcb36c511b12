//! Persistence layer for the monitoring audit trail.
//!
//! Four append-mostly record kinds: snapshots, assessments, planned
//! actions and assistance requests, plus bounded time-window queries for
//! the API and reports. The core only requires write-after-produce; a
//! failed write degrades to a warning, never to a failed cycle.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{ActionRecord, RecordStore};
