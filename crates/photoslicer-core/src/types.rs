//! Job lifecycle types shared across crates

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the primary action control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// No job running; the action starts one
    #[default]
    Idle,
    /// A pausable job is running
    Processing,
    /// A pausable job is paused
    Paused,
    /// A single-shot job is running; the action is inert
    Busy,
}

impl JobState {
    /// Whether a job is in flight
    pub fn is_active(&self) -> bool {
        !matches!(self, JobState::Idle)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Processing => write!(f, "processing"),
            Self::Paused => write!(f, "paused"),
            Self::Busy => write!(f, "busy"),
        }
    }
}

/// Backend workflow selected for a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobMode {
    /// One folder, one output, no pause/resume
    Single,
    /// Every sub-folder of the source, pausable
    #[default]
    Batch,
}

impl JobMode {
    /// Tab identifier that selects the single-folder workflow
    pub const SINGLE_TAB: &'static str = "single";

    /// Derive the workflow from the active tab identifier
    pub fn for_tab(tab: &str) -> Self {
        if tab == Self::SINGLE_TAB {
            JobMode::Single
        } else {
            JobMode::Batch
        }
    }

    /// Whether jobs of this mode accept pause/resume
    pub fn is_pausable(&self) -> bool {
        matches!(self, JobMode::Batch)
    }

    /// State entered when a job of this mode starts
    pub fn running_state(&self) -> JobState {
        match self {
            JobMode::Single => JobState::Busy,
            JobMode::Batch => JobState::Processing,
        }
    }
}

impl fmt::Display for JobMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Batch => write!(f, "multi"),
        }
    }
}
