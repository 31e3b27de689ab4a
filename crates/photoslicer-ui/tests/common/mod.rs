#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use photoslicer_core::JobMode;
use photoslicer_settings::{SessionConfig, SettingsSnapshot};
use photoslicer_ui::{Backend, BackendEvent, Operation, OperatorInput, Session, SessionEvent};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// Mock backend recording every call
pub struct RecordingBackend {
    calls: Mutex<Vec<Operation>>,
    saved: Mutex<Vec<SettingsSnapshot>>,
    started: Mutex<Vec<(JobMode, PathBuf)>>,
    opened: Mutex<Vec<PathBuf>>,
    failing: Mutex<HashSet<Operation>>,
    hanging: Mutex<HashSet<Operation>>,
    delays: Mutex<HashMap<Operation, Duration>>,
    folder: Mutex<Option<PathBuf>>,
    is_directory: AtomicBool,
}

impl RecordingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
            started: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            hanging: Mutex::new(HashSet::new()),
            delays: Mutex::new(HashMap::new()),
            folder: Mutex::new(None),
            is_directory: AtomicBool::new(true),
        })
    }

    pub fn fail(&self, operation: Operation) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.failing.lock().unwrap().remove(&operation);
    }

    pub fn hang(&self, operation: Operation) {
        self.hanging.lock().unwrap().insert(operation);
    }

    /// Answer `operation` only after `delay`
    pub fn delay(&self, operation: Operation, delay: Duration) {
        self.delays.lock().unwrap().insert(operation, delay);
    }

    pub fn set_is_directory(&self, value: bool) {
        self.is_directory.store(value, Ordering::SeqCst);
    }

    pub fn set_folder(&self, folder: Option<&str>) {
        *self.folder.lock().unwrap() = folder.map(PathBuf::from);
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|op| **op == operation)
            .count()
    }

    pub fn saved(&self) -> Vec<SettingsSnapshot> {
        self.saved.lock().unwrap().clone()
    }

    pub fn started(&self) -> Vec<(JobMode, PathBuf)> {
        self.started.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap().clone()
    }

    async fn respond(&self, operation: Operation) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(operation);
        let hang = self.hanging.lock().unwrap().contains(&operation);
        if hang {
            std::future::pending::<()>().await;
        }
        let delay = self.delays.lock().unwrap().get(&operation).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let fail = self.failing.lock().unwrap().contains(&operation);
        if fail {
            return Err(anyhow!("{} refused", operation));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    async fn select_folder(&self) -> anyhow::Result<Option<PathBuf>> {
        self.respond(Operation::SelectFolder).await?;
        Ok(self.folder.lock().unwrap().clone())
    }

    async fn is_directory(&self, _path: &Path) -> anyhow::Result<bool> {
        self.respond(Operation::IsDirectory).await?;
        Ok(self.is_directory.load(Ordering::SeqCst))
    }

    async fn start(&self, mode: JobMode, source: &Path) -> anyhow::Result<()> {
        self.started
            .lock()
            .unwrap()
            .push((mode, source.to_path_buf()));
        self.respond(Operation::Start).await
    }

    async fn pause_processing(&self) -> anyhow::Result<()> {
        self.respond(Operation::PauseProcessing).await
    }

    async fn resume_processing(&self) -> anyhow::Result<()> {
        self.respond(Operation::ResumeProcessing).await
    }

    async fn save_settings(&self, snapshot: &SettingsSnapshot) -> anyhow::Result<()> {
        self.saved.lock().unwrap().push(snapshot.clone());
        self.respond(Operation::SaveSettings).await
    }

    async fn open_file_explorer(&self, path: &Path) -> anyhow::Result<()> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        self.respond(Operation::OpenFileExplorer).await
    }

    async fn minimize_window(&self) -> anyhow::Result<()> {
        self.respond(Operation::MinimizeWindow).await
    }

    async fn close_window(&self) -> anyhow::Result<()> {
        self.respond(Operation::CloseWindow).await
    }

    async fn app_ready(&self) -> anyhow::Result<()> {
        self.respond(Operation::AppReady).await
    }
}

pub fn session(backend: &Arc<RecordingBackend>) -> Session {
    session_with(backend, SessionConfig::default())
}

pub fn session_with(backend: &Arc<RecordingBackend>, config: SessionConfig) -> Session {
    let backend: Arc<dyn Backend> = backend.clone();
    Session::new(config, backend)
}

/// Deliver an operator input and let the resulting bridge calls finish
pub async fn input(session: &mut Session, input: OperatorInput) {
    session.handle_event(SessionEvent::Operator(input));
    session.settle().await;
}

/// Deliver a backend callback
pub async fn backend_event(session: &mut Session, event: BackendEvent) {
    session.handle_event(SessionEvent::Backend(event));
    session.settle().await;
}

/// Fill the source field and press the action control
pub async fn start_job(session: &mut Session, source: &str) {
    input(session, OperatorInput::SetSource(source.to_string())).await;
    input(session, OperatorInput::Trigger).await;
}
