//! Job state machine
//!
//! Owns the state of the primary action control and decides what a trigger
//! means in each state. Transitions are applied optimistically when a
//! command is issued and reverted if the bridge reports the command failed.
//!
//! ```text
//! Idle --trigger--> (verify source) --> Processing | Busy
//! Processing --trigger--> Paused --trigger--> Processing
//! any --completion--> Idle
//! ```

use crate::bridge::Operation;
use crate::locale::translate_or_key;
use photoslicer_core::{BridgeError, JobMode, JobState, ValidationError};
use photoslicer_settings::LanguageId;
use serde::Serialize;
use std::path::PathBuf;

/// A state change of the action control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: JobState,
    pub to: JobState,
}

impl Transition {
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

/// Command sent to the backend as a result of a trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobCommand {
    Start { source: PathBuf, mode: JobMode },
    Pause,
    Resume,
}

impl JobCommand {
    pub fn operation(&self) -> Operation {
        match self {
            JobCommand::Start { .. } => Operation::Start,
            JobCommand::Pause => Operation::PauseProcessing,
            JobCommand::Resume => Operation::ResumeProcessing,
        }
    }
}

/// Why a trigger was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Disabled,
    Busy,
    Verifying,
}

/// What a trigger resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Nothing happens
    Ignored(IgnoreReason),
    /// The source failed local validation; state unchanged
    Rejected(ValidationError),
    /// The source must be verified as a directory before starting
    Verify(PathBuf),
    /// A command must be sent; the transition is already applied
    Command {
        command: JobCommand,
        transition: Transition,
    },
}

/// Result of a source verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCheck {
    /// The job starts; the transition is already applied
    Start {
        command: JobCommand,
        transition: Transition,
    },
    Rejected(ValidationError),
    Failed(BridgeError),
    /// No verification was pending, or the state moved on meanwhile
    Stale,
}

/// Icon shown on the action control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionIcon {
    Rocket,
    Pause,
    Play,
    Hourglass,
}

/// Rendered content of the action control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionContent {
    pub icon: ActionIcon,
    pub label: String,
}

impl ActionContent {
    /// Content for a state in a language
    pub fn for_state(state: JobState, language: LanguageId) -> Self {
        let (icon, key) = match state {
            JobState::Idle => (ActionIcon::Rocket, "action.initiate"),
            JobState::Processing => (ActionIcon::Pause, "action.pause"),
            JobState::Paused => (ActionIcon::Play, "action.resume"),
            JobState::Busy => (ActionIcon::Hourglass, "action.processing"),
        };
        Self {
            icon,
            label: translate_or_key(language, key),
        }
    }
}

/// Translation key of the status line shown in a state; `None` leaves it unchanged
pub fn status_key(state: JobState) -> Option<&'static str> {
    match state {
        JobState::Idle => None,
        JobState::Processing | JobState::Busy => Some("status.processing"),
        JobState::Paused => Some("status.paused"),
    }
}

#[derive(Debug, Clone)]
pub struct JobStateMachine {
    state: JobState,
    enabled: bool,
    verifying: Option<PathBuf>,
    mode: Option<JobMode>,
}

impl Default for JobStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl JobStateMachine {
    pub fn new() -> Self {
        Self {
            state: JobState::Idle,
            enabled: true,
            verifying: None,
            mode: None,
        }
    }

    /// Handle the operator pressing the action control
    ///
    /// `source` is the raw content of the source field.
    pub fn trigger(&mut self, source: &str) -> Trigger {
        if !self.enabled {
            return Trigger::Ignored(IgnoreReason::Disabled);
        }
        if self.verifying.is_some() {
            return Trigger::Ignored(IgnoreReason::Verifying);
        }

        match self.state {
            JobState::Busy => Trigger::Ignored(IgnoreReason::Busy),
            JobState::Idle => {
                let source = source.trim();
                if source.is_empty() {
                    return Trigger::Rejected(ValidationError::EmptySource);
                }
                let path = PathBuf::from(source);
                self.verifying = Some(path.clone());
                Trigger::Verify(path)
            }
            JobState::Processing => Trigger::Command {
                command: JobCommand::Pause,
                transition: self.transition(JobState::Paused),
            },
            JobState::Paused => Trigger::Command {
                command: JobCommand::Resume,
                transition: self.transition(JobState::Processing),
            },
        }
    }

    /// Apply the outcome of the directory check for `path`
    pub fn confirm_source(
        &mut self,
        path: PathBuf,
        mode: JobMode,
        result: Result<bool, BridgeError>,
    ) -> SourceCheck {
        if self.verifying.as_ref() != Some(&path) {
            return SourceCheck::Stale;
        }
        self.verifying = None;
        if self.state != JobState::Idle {
            return SourceCheck::Stale;
        }

        match result {
            Ok(true) => {
                self.mode = Some(mode);
                let transition = self.transition(mode.running_state());
                SourceCheck::Start {
                    command: JobCommand::Start { source: path, mode },
                    transition,
                }
            }
            Ok(false) => SourceCheck::Rejected(ValidationError::NotADirectory { path }),
            Err(e) => SourceCheck::Failed(e),
        }
    }

    /// Revert the optimistic transition of a failed command
    ///
    /// Returns `None` when the state has already moved past the command.
    pub fn command_failed(&mut self, command: &JobCommand) -> Option<Transition> {
        let target = match (command, self.state) {
            (JobCommand::Start { .. }, state) if state.is_active() => JobState::Idle,
            (JobCommand::Pause, JobState::Paused) => JobState::Processing,
            (JobCommand::Resume, JobState::Processing) => JobState::Paused,
            _ => return None,
        };
        if target == JobState::Idle {
            self.mode = None;
        }
        Some(self.transition(target))
    }

    /// The backend reported the job finished
    pub fn complete(&mut self) -> Transition {
        self.mode = None;
        self.transition(JobState::Idle)
    }

    /// Gate whether triggers are accepted, independent of the state
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_verifying(&self) -> bool {
        self.verifying.is_some()
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Workflow of the running job
    pub fn mode(&self) -> Option<JobMode> {
        self.mode
    }

    pub fn action_content(&self, language: LanguageId) -> ActionContent {
        ActionContent::for_state(self.state, language)
    }

    fn transition(&mut self, to: JobState) -> Transition {
        let from = self.state;
        self.state = to;
        if from != to {
            tracing::info!("Job state {} -> {}", from, to);
        }
        Transition { from, to }
    }
}
