//! SessionDirectory — the process-wide registry of sessions (§4.6).

use std::sync::{Arc, Mutex};

use serde_json::Value;
use style_core::ids::SessionId;
use style_core::model::Channel;

use crate::dispatcher::{EventSink, NullSink, SessionDispatcher};
use crate::events::{Event, EventType};

const DEFAULT_QUEUE_CAPACITY: usize = 256;

struct SessionEntry {
    subscriptions: style_core::FxHashSet<Channel>,
    dispatcher: Arc<SessionDispatcher>,
}

/// Registers sessions, tracks channel subscriptions, and fans out events.
/// One instance is shared process-wide (§4.6, §5 "no global mutable state
/// except ... session directory").
pub struct SessionDirectory {
    sessions: Mutex<style_core::FxHashMap<SessionId, SessionEntry>>,
    queue_capacity: usize,
}

impl SessionDirectory {
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(style_core::FxHashMap::default()),
            queue_capacity,
        }
    }

    /// Explicit client connect, with a real transport sink attached.
    pub fn register(&self, session_id: SessionId, sink: Arc<dyn EventSink>) {
        let dispatcher = Arc::new(SessionDispatcher::spawn(sink, self.queue_capacity));
        self.sessions.lock().unwrap().insert(
            session_id,
            SessionEntry {
                subscriptions: style_core::FxHashSet::default(),
                dispatcher,
            },
        );
    }

    /// Auto-registration on first emit to an unknown session id (§4.6).
    /// Events are buffered and discarded by a `NullSink` until a real
    /// transport later calls `register` for the same id.
    fn auto_register(&self, session_id: &SessionId) {
        let mut sessions = self.sessions.lock().unwrap();
        if !sessions.contains_key(session_id) {
            tracing::debug!(session_id = %session_id, "auto-registered session on first emit");
            let dispatcher = Arc::new(SessionDispatcher::spawn(Arc::new(NullSink), self.queue_capacity));
            sessions.insert(
                session_id.clone(),
                SessionEntry {
                    subscriptions: style_core::FxHashSet::default(),
                    dispatcher,
                },
            );
        }
    }

    pub fn subscribe(&self, session_id: &SessionId, channel: Channel) {
        self.auto_register(session_id);
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(entry) = sessions.get_mut(session_id) {
            entry.subscriptions.insert(channel);
        }
    }

    pub fn unregister(&self, session_id: &SessionId) {
        self.sessions.lock().unwrap().remove(session_id);
    }

    pub fn is_registered(&self, session_id: &SessionId) -> bool {
        self.sessions.lock().unwrap().contains_key(session_id)
    }

    /// Emits an event to one session, or broadcasts to every registered
    /// session when `session_id` is `None` (§4.6).
    pub fn emit(&self, session_id: Option<&SessionId>, event_type: EventType, payload: Value) {
        match session_id {
            Some(id) => {
                self.auto_register(id);
                let sessions = self.sessions.lock().unwrap();
                if let Some(entry) = sessions.get(id) {
                    entry
                        .dispatcher
                        .push(Event::new(Some(id.to_string()), event_type, payload));
                }
            }
            None => {
                let sessions = self.sessions.lock().unwrap();
                for (id, entry) in sessions.iter() {
                    entry.dispatcher.push(Event::new(
                        Some(id.to_string()),
                        event_type,
                        payload.clone(),
                    ));
                }
            }
        }
    }

    /// Broadcasts a `threshold_changed` event to every session (§4.6).
    pub fn broadcast_threshold_change(&self, new_threshold: f64, changed_by_session_id: &SessionId) {
        self.emit(
            None,
            EventType::ThresholdChanged,
            serde_json::json!({
                "new_threshold": new_threshold,
                "changed_by_session_id": changed_by_session_id.to_string(),
            }),
        );
    }

    /// Sum of dropped-event counts across all sessions, for the periodic
    /// dropped-count diagnostic (§4.6).
    pub fn total_dropped_count(&self) -> u64 {
        self.sessions
            .lock()
            .unwrap()
            .values()
            .map(|entry| entry.dispatcher.dropped_count())
            .sum()
    }
}

impl Default for SessionDirectory {
    fn default() -> Self {
        Self::new()
    }
}
