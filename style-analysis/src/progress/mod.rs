//! Progress Tracker (H, §4.5): one instance per rewrite job, all state
//! transitions guarded by a single lock so emission order matches the
//! state's own mutation order at subscribers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use style_core::model::rewrite::{Delta, Improvement};
use style_core::FxHashMap;

/// `pending -> processing -> {complete, error, cancelled}`; only forward
/// transitions are allowed (§4.5 state machine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationState {
    Pending,
    Processing,
    Complete,
    Error,
    Cancelled,
}

impl StationState {
    fn can_transition_to(self, next: StationState) -> bool {
        use StationState::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Complete)
                | (Processing, Error)
                | (Processing, Cancelled)
                | (Pending, Cancelled)
        )
    }
}

struct StationRecord {
    name: String,
    state: StationState,
    sub_progress: f64,
    errors_count: usize,
    errors_fixed: usize,
    started_at: Option<Instant>,
    duration: Option<Duration>,
}

struct PassRecord {
    name: String,
    stations_completed: usize,
    state: StationState,
}

struct TrackerState {
    stations: Vec<String>,
    station_records: FxHashMap<String, StationRecord>,
    total_stations_in_pass: usize,
    total_passes: u32,
    current_pass: u32,
    passes: FxHashMap<u32, PassRecord>,
    current_station: Option<String>,
}

impl TrackerState {
    /// `((completed_passes + in_pass_progress) / total_passes) * 100` where
    /// `in_pass_progress = (stations_done + 0.5 * in_flight) / total_stations_in_pass`
    /// (§4.5, reproduced from the original's `_calculate_overall_progress`).
    fn overall_percent(&self) -> u32 {
        if self.total_passes == 0 || self.total_stations_in_pass == 0 {
            return 0;
        }
        let completed_passes = self.current_pass.saturating_sub(1) as f64;

        let stations_done = self
            .station_records
            .values()
            .filter(|s| s.state == StationState::Complete)
            .count() as f64;
        let in_flight = self
            .station_records
            .values()
            .filter(|s| s.state == StationState::Processing)
            .count() as f64;
        let in_pass_progress = (stations_done + 0.5 * in_flight) / self.total_stations_in_pass as f64;

        let overall = ((completed_passes + in_pass_progress) / self.total_passes as f64) * 100.0;
        overall.min(100.0).max(0.0) as u32
    }
}

/// Thread-safe progress tracker, one per rewrite job (§4.5). `last_percent`
/// is a separate atomic so `overall_percent()` can be read without the lock
/// and so monotonicity can be asserted cheaply by callers/tests.
pub struct ProgressTracker {
    state: Mutex<TrackerState>,
    last_percent: AtomicU64,
}

impl ProgressTracker {
    /// `init(stations, total_passes)` (§4.5).
    pub fn init(stations: &[String], total_passes: u32) -> Self {
        let station_records = stations
            .iter()
            .map(|s| {
                (
                    s.clone(),
                    StationRecord {
                        name: s.clone(),
                        state: StationState::Pending,
                        sub_progress: 0.0,
                        errors_count: 0,
                        errors_fixed: 0,
                        started_at: None,
                        duration: None,
                    },
                )
            })
            .collect();

        Self {
            state: Mutex::new(TrackerState {
                stations: stations.to_vec(),
                station_records,
                total_stations_in_pass: stations.len().max(1),
                total_passes: total_passes.max(1),
                current_pass: 0,
                passes: FxHashMap::default(),
                current_station: None,
            }),
            last_percent: AtomicU64::new(0),
        }
    }

    pub fn start_pass(&self, pass_number: u32, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.current_pass = pass_number;
        state.passes.insert(
            pass_number,
            PassRecord {
                name: name.to_string(),
                stations_completed: 0,
                state: StationState::Processing,
            },
        );
        // Each pass re-runs the full station list (§4.5 "Passes"), so every
        // station goes back to `pending` for the new pass. Without this,
        // `start_station` on pass 2+ would try `Complete -> Processing`,
        // which isn't a legal transition.
        for record in state.station_records.values_mut() {
            record.state = StationState::Pending;
            record.sub_progress = 0.0;
            record.errors_count = 0;
            record.errors_fixed = 0;
            record.started_at = None;
            record.duration = None;
        }
        self.record_percent(&state);
    }

    pub fn complete_pass(&self, pass_number: u32) {
        let mut state = self.state.lock().unwrap();
        if let Some(pass) = state.passes.get_mut(&pass_number) {
            pass.state = StationState::Complete;
        }
        self.record_percent(&state);
    }

    pub fn start_station(&self, station_id: &str, name: &str, error_count: usize) {
        let mut state = self.state.lock().unwrap();
        state.current_station = Some(station_id.to_string());
        if let Some(record) = state.station_records.get_mut(station_id) {
            debug_assert!(
                record.state.can_transition_to(StationState::Processing),
                "illegal transition for station {station_id}"
            );
            record.state = StationState::Processing;
            record.errors_count = error_count;
            record.sub_progress = 0.0;
            record.started_at = Some(Instant::now());
            record.name = name.to_string();
        }
        self.record_percent(&state);
    }

    pub fn update_station(&self, station_id: &str, sub_progress: f64, _message: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(record) = state.station_records.get_mut(station_id) {
            record.sub_progress = sub_progress.clamp(0.0, 1.0);
        }
        self.record_percent(&state);
    }

    pub fn complete_station(&self, station_id: &str, errors_fixed: usize, _deltas: &[Delta]) {
        let mut state = self.state.lock().unwrap();
        let current_pass = state.current_pass;
        if let Some(record) = state.station_records.get_mut(station_id) {
            debug_assert!(
                record.state.can_transition_to(StationState::Complete),
                "illegal transition for station {station_id}"
            );
            record.state = StationState::Complete;
            record.sub_progress = 1.0;
            record.errors_fixed = errors_fixed;
            record.duration = record.started_at.map(|t| t.elapsed());
        }
        if let Some(pass) = state.passes.get_mut(&current_pass) {
            pass.stations_completed += 1;
        }
        self.record_percent(&state);
    }

    /// `record_error(exception, station_id?)` — transitions the named
    /// station (if any) to `error` (§4.5).
    pub fn record_error(&self, station_id: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        if let Some(id) = station_id {
            if let Some(record) = state.station_records.get_mut(id) {
                if record.state.can_transition_to(StationState::Error) {
                    record.state = StationState::Error;
                }
            }
        }
        self.record_percent(&state);
    }

    /// Marks every pending/processing station `cancelled` (§4.5 cancellation
    /// policy: "the current station completes or times out, the tracker is
    /// transitioned to cancelled").
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        for record in state.station_records.values_mut() {
            if record.state.can_transition_to(StationState::Cancelled) {
                record.state = StationState::Cancelled;
            }
        }
        self.record_percent(&state);
    }

    pub fn overall_percent(&self) -> u32 {
        self.last_percent.load(Ordering::SeqCst) as u32
    }

    pub fn improvements_so_far(&self) -> Vec<Improvement> {
        let state = self.state.lock().unwrap();
        state
            .station_records
            .values()
            .filter(|r| r.state == StationState::Complete && r.errors_fixed > 0)
            .map(|r| Improvement {
                label: r.name.clone(),
                detail: format!("fixed {} issue(s)", r.errors_fixed),
            })
            .collect()
    }

    /// Computes the new percent under the lock and stores it monotonically
    /// (§4.5: "overall_percent is monotonically non-decreasing during a job").
    fn record_percent(&self, state: &TrackerState) {
        let computed = state.overall_percent() as u64;
        self.last_percent.fetch_max(computed, Ordering::SeqCst);
    }
}
