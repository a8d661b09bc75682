//! Per-session single-threaded event dispatcher (§4.6, §5).
//!
//! One OS thread per session drains a bounded, drop-oldest-progress queue
//! and forwards events to an injected `EventSink`, guaranteeing that events
//! from one producer arrive at the subscriber in submission order. Grounded
//! on the teacher's `TelemetryCollector` (`Arc<Mutex<Vec<_>>>` capped
//! buffer, opt-in drain), extended with a background worker and an eviction
//! policy instead of a flush-on-demand buffer.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crate::events::Event;

/// Production wiring supplies a real transport (websocket, SSE); tests
/// supply a recording sink (§9 Design Notes: "event bus capability").
pub trait EventSink: Send + Sync {
    fn send(&self, event: Event);
}

/// A sink that discards every event. Used for sessions that were
/// auto-registered on first emit but never explicitly connected.
pub struct NullSink;

impl EventSink for NullSink {
    fn send(&self, _event: Event) {}
}

struct State {
    queue: Mutex<VecDeque<Event>>,
    capacity: usize,
    not_empty: Condvar,
    closed: AtomicBool,
    dropped_count: AtomicU64,
}

/// Owns one session's outbound queue and worker thread.
pub struct SessionDispatcher {
    state: Arc<State>,
    worker: Option<JoinHandle<()>>,
}

impl SessionDispatcher {
    pub fn spawn(sink: Arc<dyn EventSink>, capacity: usize) -> Self {
        let state = Arc::new(State {
            queue: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity,
            not_empty: Condvar::new(),
            closed: AtomicBool::new(false),
            dropped_count: AtomicU64::new(0),
        });

        let worker_state = Arc::clone(&state);
        let worker = thread::spawn(move || dispatch_loop(worker_state, sink));

        Self {
            state,
            worker: Some(worker),
        }
    }

    /// Enqueues an event for delivery, applying the drop-oldest-progress
    /// policy (§4.6) when the queue is at capacity.
    pub fn push(&self, event: Event) {
        let mut queue = self.state.queue.lock().unwrap();
        if queue.len() >= self.state.capacity {
            if let Some(pos) = queue.iter().position(|e| e.event_type.is_droppable()) {
                queue.remove(pos);
                let dropped = self.state.dropped_count.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::debug!(dropped_total = dropped, "evicted oldest progress-type event, queue full");
            } else if event.event_type.is_droppable() {
                let dropped = self.state.dropped_count.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(dropped_total = dropped, "queue full of non-droppable events, dropping incoming progress event");
                return;
            }
        }
        queue.push_back(event);
        self.state.not_empty.notify_one();
    }

    /// Count of events dropped since dispatcher creation, for the periodic
    /// dropped-count diagnostic (§4.6).
    pub fn dropped_count(&self) -> u64 {
        self.state.dropped_count.load(Ordering::Relaxed)
    }
}

impl Drop for SessionDispatcher {
    fn drop(&mut self) {
        self.state.closed.store(true, Ordering::Release);
        self.state.not_empty.notify_all();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn dispatch_loop(state: Arc<State>, sink: Arc<dyn EventSink>) {
    loop {
        let mut queue = state.queue.lock().unwrap();
        while queue.is_empty() && !state.closed.load(Ordering::Acquire) {
            queue = state.not_empty.wait(queue).unwrap();
        }
        let event = queue.pop_front();
        drop(queue);
        match event {
            Some(event) => sink.send(event),
            None if state.closed.load(Ordering::Acquire) => return,
            None => continue,
        }
    }
}
