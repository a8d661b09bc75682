//! RewriteJob and the station-output shapes threaded through the assembly
//! line (§3, §4.5).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A labelled micro-edit, as returned by the text-transformation capability
/// and consumed by the UI to render diff-style previews (§4.5, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delta {
    pub kind: String,
    pub before: String,
    pub after: String,
    pub span: (usize, usize),
}

/// One completed station's contribution to a rewrite job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationOutput {
    pub station_id: String,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    pub text_after: String,
    pub deltas: Vec<Delta>,
    pub errors_fixed: usize,
}

/// A labelled improvement surfaced to the caller on job completion (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Improvement {
    pub label: String,
    pub detail: String,
}

/// Per-block rewrite task (§3, §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteJob {
    pub block_id: String,
    pub block_content: String,
    pub applicable_stations: Vec<String>,
    pub total_passes: u32,
    pub current_station: Option<String>,
    pub current_pass: u32,
    pub station_outputs: Vec<StationOutput>,
    pub final_text: Option<String>,
    pub errors_fixed: usize,
    pub improvements: Vec<Improvement>,
    /// Set once a station fails and the job proceeds on the last-good text
    /// instead of aborting (§7 RewriteError: "the job completes with a
    /// partial-success flag").
    pub partial_success: bool,
}

impl RewriteJob {
    pub fn new(block_id: impl Into<String>, block_content: impl Into<String>, total_passes: u32) -> Self {
        Self {
            block_id: block_id.into(),
            block_content: block_content.into(),
            applicable_stations: Vec::new(),
            total_passes,
            current_station: None,
            current_pass: 0,
            station_outputs: Vec::new(),
            final_text: None,
            errors_fixed: 0,
            improvements: Vec::new(),
            partial_success: false,
        }
    }
}

mod duration_millis {
    use super::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        (value.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
