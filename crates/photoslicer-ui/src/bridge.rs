//! Backend bridge
//!
//! The backend automation service is reached through the [`Backend`] trait.
//! [`Bridge`] wraps a backend and turns every call into a future with a
//! typed outcome, so callers never see a raw `anyhow::Error`. Calls are
//! time-limited unless they wait on the operator.

use async_trait::async_trait;
use photoslicer_core::{BridgeError, JobMode};
use photoslicer_settings::SettingsSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Operations offered by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    SelectFolder,
    IsDirectory,
    Start,
    PauseProcessing,
    ResumeProcessing,
    SaveSettings,
    OpenFileExplorer,
    MinimizeWindow,
    CloseWindow,
    AppReady,
}

impl Operation {
    /// Wire name of the operation
    pub fn name(&self) -> &'static str {
        match self {
            Operation::SelectFolder => "select_folder",
            Operation::IsDirectory => "is_directory",
            Operation::Start => "start",
            Operation::PauseProcessing => "pause_processing",
            Operation::ResumeProcessing => "resume_processing",
            Operation::SaveSettings => "save_settings",
            Operation::OpenFileExplorer => "open_file_explorer",
            Operation::MinimizeWindow => "minimize_window",
            Operation::CloseWindow => "close_window",
            Operation::AppReady => "app_ready",
        }
    }

    /// Operations that wait on the operator (a picker or a confirm dialog)
    /// and are never timed out
    pub fn is_interactive(&self) -> bool {
        matches!(self, Operation::SelectFolder | Operation::CloseWindow)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Backend automation service
///
/// Implementations perform the real work (folder picker, job processing,
/// settings file, window management). Every method may fail; the session
/// turns failures into operator notifications.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Open a folder picker; `None` when the operator cancelled
    async fn select_folder(&self) -> anyhow::Result<Option<PathBuf>>;

    /// Whether `path` names an existing directory
    async fn is_directory(&self, path: &Path) -> anyhow::Result<bool>;

    /// Start a job on `source`
    async fn start(&self, mode: JobMode, source: &Path) -> anyhow::Result<()>;

    async fn pause_processing(&self) -> anyhow::Result<()>;

    async fn resume_processing(&self) -> anyhow::Result<()>;

    /// Persist the complete settings document
    async fn save_settings(&self, snapshot: &SettingsSnapshot) -> anyhow::Result<()>;

    /// Reveal `path` in the platform file manager
    async fn open_file_explorer(&self, path: &Path) -> anyhow::Result<()>;

    async fn minimize_window(&self) -> anyhow::Result<()>;

    async fn close_window(&self) -> anyhow::Result<()>;

    /// Tell the backend the view is ready to receive callbacks
    async fn app_ready(&self) -> anyhow::Result<()>;
}

/// Time-limited, typed access to a [`Backend`]
#[derive(Clone)]
pub struct Bridge {
    backend: Arc<dyn Backend>,
    timeout: Duration,
}

impl Bridge {
    pub fn new(backend: Arc<dyn Backend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Time limit applied to non-interactive calls
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn select_folder(&self) -> Result<Option<PathBuf>, BridgeError> {
        self.call(Operation::SelectFolder, self.backend.select_folder())
            .await
    }

    pub async fn is_directory(&self, path: &Path) -> Result<bool, BridgeError> {
        self.call(Operation::IsDirectory, self.backend.is_directory(path))
            .await
    }

    pub async fn start(&self, mode: JobMode, source: &Path) -> Result<(), BridgeError> {
        self.call(Operation::Start, self.backend.start(mode, source))
            .await
    }

    pub async fn pause_processing(&self) -> Result<(), BridgeError> {
        self.call(Operation::PauseProcessing, self.backend.pause_processing())
            .await
    }

    pub async fn resume_processing(&self) -> Result<(), BridgeError> {
        self.call(Operation::ResumeProcessing, self.backend.resume_processing())
            .await
    }

    pub async fn save_settings(&self, snapshot: &SettingsSnapshot) -> Result<(), BridgeError> {
        self.call(Operation::SaveSettings, self.backend.save_settings(snapshot))
            .await
    }

    pub async fn open_file_explorer(&self, path: &Path) -> Result<(), BridgeError> {
        self.call(
            Operation::OpenFileExplorer,
            self.backend.open_file_explorer(path),
        )
        .await
    }

    pub async fn minimize_window(&self) -> Result<(), BridgeError> {
        self.call(Operation::MinimizeWindow, self.backend.minimize_window())
            .await
    }

    pub async fn close_window(&self) -> Result<(), BridgeError> {
        self.call(Operation::CloseWindow, self.backend.close_window())
            .await
    }

    pub async fn app_ready(&self) -> Result<(), BridgeError> {
        self.call(Operation::AppReady, self.backend.app_ready())
            .await
    }

    async fn call<T, F>(&self, operation: Operation, fut: F) -> Result<T, BridgeError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        tracing::trace!("Bridge call {}", operation);
        let result = if operation.is_interactive() {
            fut.await
        } else {
            match tokio::time::timeout(self.timeout, fut).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(BridgeError::Timeout {
                        operation: operation.name().to_string(),
                        timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    })
                }
            }
        };
        result.map_err(|e| BridgeError::Failed {
            operation: operation.name().to_string(),
            reason: format!("{:#}", e),
        })
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    const PICKER_DELAY: Duration = Duration::from_secs(15);

    struct StubBackend;

    #[async_trait]
    impl Backend for StubBackend {
        async fn select_folder(&self) -> anyhow::Result<Option<PathBuf>> {
            tokio::time::sleep(PICKER_DELAY).await;
            Ok(Some(PathBuf::from("/photos")))
        }

        async fn is_directory(&self, _path: &Path) -> anyhow::Result<bool> {
            std::future::pending().await
        }

        async fn start(&self, _mode: JobMode, _source: &Path) -> anyhow::Result<()> {
            Err(anyhow!("worker crashed"))
        }

        async fn pause_processing(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn resume_processing(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn save_settings(&self, _snapshot: &SettingsSnapshot) -> anyhow::Result<()> {
            Ok(())
        }

        async fn open_file_explorer(&self, _path: &Path) -> anyhow::Result<()> {
            Ok(())
        }

        async fn minimize_window(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn close_window(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn app_ready(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn bridge() -> Bridge {
        Bridge::new(Arc::new(StubBackend), Duration::from_millis(250))
    }

    #[tokio::test(start_paused = true)]
    async fn test_folder_picker_is_not_timed_out() {
        let started = tokio::time::Instant::now();
        let folder = bridge().select_folder().await.unwrap();
        assert_eq!(folder, Some(PathBuf::from("/photos")));
        assert!(started.elapsed() >= PICKER_DELAY);
    }

    #[tokio::test]
    async fn test_success_passes_value_through() {
        assert_eq!(bridge().pause_processing().await, Ok(()));
    }

    #[tokio::test]
    async fn test_failure_is_typed() {
        let err = bridge()
            .start(JobMode::Batch, Path::new("/photos"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BridgeError::Failed {
                operation: "start".to_string(),
                reason: "worker crashed".to_string(),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_call_times_out() {
        let err = bridge()
            .is_directory(Path::new("/photos"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BridgeError::Timeout {
                operation: "is_directory".to_string(),
                timeout_ms: 250,
            }
        );
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::PauseProcessing.to_string(), "pause_processing");
        assert_eq!(Operation::AppReady.name(), "app_ready");
    }

    #[test]
    fn test_only_operator_facing_calls_are_interactive() {
        assert!(Operation::SelectFolder.is_interactive());
        assert!(Operation::CloseWindow.is_interactive());
        assert!(!Operation::IsDirectory.is_interactive());
        assert!(!Operation::SaveSettings.is_interactive());
    }
}
