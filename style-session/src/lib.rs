//! # style-session
//!
//! The Session & Event Fabric (§4.6): a process-wide directory of sessions,
//! each with its own single-threaded event dispatcher guaranteeing
//! per-producer ordering and a bounded, drop-oldest-progress outbound queue.

pub mod directory;
pub mod dispatcher;
pub mod events;

pub use directory::SessionDirectory;
pub use dispatcher::{EventSink, NullSink, SessionDispatcher};
pub use events::{Event, EventType};
