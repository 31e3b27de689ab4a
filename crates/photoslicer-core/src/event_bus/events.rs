//! Session events
//!
//! One enum per category, wrapped in [`AppEvent`]. Every event serializes,
//! so a host can forward the stream as JSON.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::{JobMode, JobState};

/// Anything the session announces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    Job(JobEvent),
    Settings(SettingsEvent),
    Ui(UiEvent),
    Notification(NotificationEvent),
}

impl AppEvent {
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Job(_) => EventCategory::Job,
            AppEvent::Settings(_) => EventCategory::Settings,
            AppEvent::Ui(_) => EventCategory::Ui,
            AppEvent::Notification(_) => EventCategory::Notification,
        }
    }

    /// One-line summary for logs and the console
    pub fn description(&self) -> String {
        match self {
            AppEvent::Job(e) => e.description(),
            AppEvent::Settings(e) => e.description(),
            AppEvent::Ui(e) => e.description(),
            AppEvent::Notification(e) => e.description(),
        }
    }
}

/// Top-level kind of an [`AppEvent`], used by [`EventFilter`](super::EventFilter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Job,
    Settings,
    Ui,
    Notification,
}

impl EventCategory {
    pub fn name(&self) -> &'static str {
        match self {
            EventCategory::Job => "Job",
            EventCategory::Settings => "Settings",
            EventCategory::Ui => "Ui",
            EventCategory::Notification => "Notification",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Job lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JobEvent {
    /// The action control changed state.
    StateChanged {
        /// State before the transition.
        from: JobState,
        /// State after the transition.
        to: JobState,
    },
    /// A start command was issued.
    Started {
        /// Source folder of the job.
        source: PathBuf,
        /// Workflow of the job.
        mode: JobMode,
    },
    /// The backend reported completion.
    Completed {
        /// Location of the job's output.
        output_path: PathBuf,
    },
    /// The backend enabled or disabled the action control.
    ActionEnabled(bool),
    /// A job command failed across the bridge.
    CommandFailed {
        /// Bridge operation name.
        operation: String,
        /// Failure description.
        reason: String,
    },
}

impl JobEvent {
    fn description(&self) -> String {
        match self {
            JobEvent::StateChanged { from, to } => format!("Job state {} -> {}", from, to),
            JobEvent::Started { source, mode } => {
                format!("Job started ({}) on {}", mode, source.display())
            }
            JobEvent::Completed { output_path } => {
                format!("Job completed: {}", output_path.display())
            }
            JobEvent::ActionEnabled(enabled) => format!(
                "Action control {}",
                if *enabled { "enabled" } else { "disabled" }
            ),
            JobEvent::CommandFailed { operation, reason } => {
                format!("Job command {} failed: {}", operation, reason)
            }
        }
    }
}

/// Settings and configuration events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingsEvent {
    /// A full settings snapshot was sent to the backend.
    Committed {
        /// Sequence number of the commit within the session.
        sequence: u64,
    },
    /// The settings snapshot could not be delivered.
    CommitFailed {
        /// Failure description.
        reason: String,
    },
    /// The interface language changed.
    LanguageChanged {
        /// Language identifier.
        language: String,
        /// Derived reading direction.
        direction: String,
    },
    /// The visual theme changed.
    ThemeChanged {
        /// Theme identifier.
        theme: String,
    },
}

impl SettingsEvent {
    fn description(&self) -> String {
        match self {
            SettingsEvent::Committed { sequence } => format!("Settings commit #{}", sequence),
            SettingsEvent::CommitFailed { reason } => format!("Settings commit failed: {}", reason),
            SettingsEvent::LanguageChanged {
                language,
                direction,
            } => format!("Language: {} ({})", language, direction),
            SettingsEvent::ThemeChanged { theme } => format!("Theme: {}", theme),
        }
    }
}

/// User interface events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiEvent {
    /// The active tab changed.
    TabSwitched {
        /// Tab identifier.
        tab: String,
    },
    /// The source folder field changed.
    SourceChanged {
        /// New field content.
        source: String,
    },
    /// The uniform zoom factor was recomputed.
    ScaleChanged {
        /// New scale factor.
        scale: f64,
    },
    /// The backend reported job progress.
    ProgressChanged {
        /// Percentage in [0, 100].
        percent: f32,
    },
}

impl UiEvent {
    fn description(&self) -> String {
        match self {
            UiEvent::TabSwitched { tab } => format!("Tab switched to {}", tab),
            UiEvent::SourceChanged { source } => format!("Source set to '{}'", source),
            UiEvent::ScaleChanged { scale } => format!("Scale {:.3}", scale),
            UiEvent::ProgressChanged { percent } => format!("Progress {:.2}%", percent),
        }
    }
}

/// Operator notification events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NotificationEvent {
    /// A success toast was shown.
    Success {
        /// Message text.
        message: String,
    },
    /// An error toast was shown.
    Error {
        /// Message text.
        message: String,
    },
}

impl NotificationEvent {
    fn description(&self) -> String {
        match self {
            NotificationEvent::Success { message } => format!("Success: {}", message),
            NotificationEvent::Error { message } => format!("Error: {}", message),
        }
    }
}
