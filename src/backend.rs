//! Local backend host
//!
//! Implements [`Backend`] on the local machine: the native folder picker,
//! file-system checks, the settings file and the platform file explorer.
//! Jobs run as a dry-run scan of the image folders that reports status and
//! progress back to the session through its [`SessionHandle`].

use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use photoslicer_core::JobMode;
use photoslicer_settings::{SettingsPersistence, SettingsSnapshot};
use photoslicer_ui::{Backend, BackendEvent, SessionHandle, ToastLevel};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;

/// Image file extensions picked up by a job
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "avif"];

/// Pause between two scanned folders
const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(250);

pub struct LocalBackend {
    settings_path: PathBuf,
    handle: OnceCell<SessionHandle>,
    paused: watch::Sender<bool>,
    step_delay: Duration,
}

impl LocalBackend {
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        let (paused, _) = watch::channel(false);
        Self {
            settings_path: settings_path.into(),
            handle: OnceCell::new(),
            paused,
            step_delay: DEFAULT_STEP_DELAY,
        }
    }

    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// Connect the backend to the session it reports to
    ///
    /// Returns `false` when a session was already attached.
    pub fn attach(&self, handle: SessionHandle) -> bool {
        self.handle.set(handle).is_ok()
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.borrow()
    }

    fn session(&self) -> anyhow::Result<SessionHandle> {
        self.handle
            .get()
            .cloned()
            .context("backend is not attached to a session")
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn select_folder(&self) -> anyhow::Result<Option<PathBuf>> {
        let folder = tokio::task::spawn_blocking(|| rfd::FileDialog::new().pick_folder())
            .await
            .context("folder picker task failed")?;
        Ok(folder)
    }

    async fn is_directory(&self, path: &Path) -> anyhow::Result<bool> {
        Ok(tokio::fs::metadata(path)
            .await
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false))
    }

    async fn start(&self, mode: JobMode, source: &Path) -> anyhow::Result<()> {
        let folders = match mode {
            JobMode::Batch => sub_folders(source).await?,
            JobMode::Single => vec![source.to_path_buf()],
        };
        if folders.is_empty() {
            anyhow::bail!("there are no folders inside {}", source.display());
        }
        if mode == JobMode::Single && collect_images(source).await?.is_empty() {
            anyhow::bail!("there are no images inside {}", source.display());
        }

        let session = self.session()?;
        self.paused.send_replace(false);
        let paused = self.paused.subscribe();

        tracing::info!(
            "Starting {:?} job on {} ({} folders)",
            mode,
            source.display(),
            folders.len()
        );
        session.backend(BackendEvent::Notify {
            level: ToastLevel::Success,
            message: format!("Preparing: {}", folder_name(source)),
        });
        tokio::spawn(scan_folders(
            session,
            folders,
            source.to_path_buf(),
            paused,
            self.step_delay,
        ));
        Ok(())
    }

    async fn pause_processing(&self) -> anyhow::Result<()> {
        self.paused.send_replace(true);
        tracing::info!("Processing paused");
        Ok(())
    }

    async fn resume_processing(&self) -> anyhow::Result<()> {
        self.paused.send_replace(false);
        tracing::info!("Processing resumed");
        Ok(())
    }

    async fn save_settings(&self, snapshot: &SettingsSnapshot) -> anyhow::Result<()> {
        let persistence = SettingsPersistence::with_snapshot(snapshot.clone());
        let path = self.settings_path.clone();
        tokio::task::spawn_blocking(move || persistence.save_to_file(&path))
            .await
            .context("settings writer task failed")??;
        tracing::debug!("Settings written to {}", self.settings_path.display());
        Ok(())
    }

    async fn open_file_explorer(&self, path: &Path) -> anyhow::Result<()> {
        let opener = file_explorer();
        tokio::process::Command::new(opener)
            .arg(path)
            .spawn()
            .with_context(|| format!("failed to launch {}", opener))?;
        tracing::info!("Opened {} in {}", path.display(), opener);
        Ok(())
    }

    async fn minimize_window(&self) -> anyhow::Result<()> {
        tracing::info!("Window minimize requested");
        Ok(())
    }

    async fn close_window(&self) -> anyhow::Result<()> {
        self.paused.send_replace(false);
        tracing::info!("Window close requested");
        Ok(())
    }

    async fn app_ready(&self) -> anyhow::Result<()> {
        tracing::info!("Frontend ready");
        Ok(())
    }
}

async fn scan_folders(
    session: SessionHandle,
    folders: Vec<PathBuf>,
    source: PathBuf,
    mut paused: watch::Receiver<bool>,
    step_delay: Duration,
) {
    let total = folders.len();
    if !session.backend(BackendEvent::Progress(0.0)) {
        return;
    }

    for (index, folder) in folders.iter().enumerate() {
        if paused.wait_for(|paused| !*paused).await.is_err() {
            tracing::warn!("Backend dropped while a job was running");
            return;
        }
        if !step_delay.is_zero() {
            tokio::time::sleep(step_delay).await;
        }

        let images = match collect_images(folder).await {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!("Skipping {}: {:#}", folder.display(), e);
                Vec::new()
            }
        };
        tracing::debug!("{}: {} images", folder.display(), images.len());

        let done = index + 1;
        let status = format!("{} - {}/{}", folder_name(folder), done, total);
        if !session.backend(BackendEvent::Status(status))
            || !session.backend(BackendEvent::Progress(done as f32 / total as f32 * 100.0))
        {
            return;
        }
    }

    session.backend(BackendEvent::ClearSource);
    session.backend(BackendEvent::Completed {
        output_path: source,
    });
}

/// Direct sub-directories of `dir`, sorted by path
pub async fn sub_folders(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("failed to read {}", dir.display()))?;
    let mut folders = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            folders.push(entry.path());
        }
    }
    folders.sort();
    Ok(folders)
}

/// Images directly inside `dir`, ordered by the first number in their name
///
/// Files without a number sort first; ties keep name order.
pub async fn collect_images(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("failed to read {}", dir.display()))?;
    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_image(&path) {
            images.push(path);
        }
    }
    images.sort_by(|a, b| {
        image_number(a)
            .cmp(&image_number(b))
            .then_with(|| a.file_name().cmp(&b.file_name()))
    });
    Ok(images)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn image_number(path: &Path) -> u64 {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let digits: String = name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_explorer() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}
