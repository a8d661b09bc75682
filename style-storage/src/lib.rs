//! # style-storage
//!
//! SQLite persistence for sessions, documents, analyses, violations, and
//! feedback (§6 persisted-state layout). WAL mode, a single serialized
//! writer plus a round-robin read pool, a batch writer for the bulk
//! ingestion path, and the `FeedbackStorage` implementation the feedback
//! service is built against.

pub mod batch;
pub mod connection;
pub mod feedback_store;
pub mod migrations;
pub mod queries;

pub use batch::{BatchCommand, BatchWriter, WriteStats};
pub use connection::{DatabaseManager, StorageError};
pub use feedback_store::SqliteFeedbackStore;
