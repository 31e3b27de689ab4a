//! Session event loop
//!
//! The session owns every controller and processes one [`SessionEvent`] at a
//! time. Bridge calls are spawned as tasks that report back through the
//! same channel, so handling an event never waits on the backend. Clock
//! ticks and toast expiry arrive the same way.

use crate::bridge::{Backend, Bridge, Operation};
use crate::job::{status_key, JobCommand, JobStateMachine, SourceCheck, Transition, Trigger};
use crate::locale::LocaleController;
use crate::notifications::{NotificationCenter, ToastLevel};
use crate::sync::{Commit, SettingsSynchronizer};
use crate::theme::ThemeController;
use crate::view::ViewState;
use crate::viewport::ViewportScaler;
use photoslicer_core::{
    AppEvent, BridgeError, ElapsedClock, EventBus, JobEvent, JobMode, JobState,
    NotificationEvent, SettingsEvent, UiEvent,
};
use photoslicer_settings::{ControlChange, LanguageId, SessionConfig, SettingsSnapshot, ThemeId};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Yields granted to spawned bridge calls before [`Session::settle`] polls
const SETTLE_YIELDS: usize = 8;

/// Input from the operator
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorInput {
    /// Press the primary action control
    Trigger,
    Browse,
    OpenResult,
    Minimize,
    Close,
    SetSource(String),
    SwitchTab(String),
    Control(ControlChange),
    SetLanguage(LanguageId),
    SetTheme(ThemeId),
}

/// Unsolicited callbacks from the backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// The job finished and wrote its output to `output_path`
    Completed { output_path: PathBuf },
    SetActionEnabled(bool),
    /// Re-render every localized text
    RefreshLabels,
    Status(String),
    /// Job progress in percent
    Progress(f32),
    Notify { level: ToastLevel, message: String },
    ClearSource,
}

/// Result of a spawned bridge call
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeOutcome {
    SourceChecked {
        path: PathBuf,
        mode: JobMode,
        result: Result<bool, BridgeError>,
    },
    Command {
        command: JobCommand,
        result: Result<(), BridgeError>,
    },
    SettingsSaved {
        sequence: u64,
        result: Result<(), BridgeError>,
    },
    FolderSelected(Result<Option<PathBuf>, BridgeError>),
    /// A call whose only payload is success or failure
    Acknowledged {
        operation: Operation,
        result: Result<(), BridgeError>,
    },
}

/// Everything the session reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Operator(OperatorInput),
    Backend(BackendEvent),
    Bridge(BridgeOutcome),
    Tick { generation: u64 },
    Resize { width: f64, height: f64 },
    ToastExpired { id: u64 },
    /// The host announced the bridge is live
    BridgeReady,
    Shutdown,
}

/// Cloneable sender into a session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    sender: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    /// Queue an event; returns `false` once the session is gone
    pub fn send(&self, event: SessionEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    pub fn operator(&self, input: OperatorInput) -> bool {
        self.send(SessionEvent::Operator(input))
    }

    pub fn backend(&self, event: BackendEvent) -> bool {
        self.send(SessionEvent::Backend(event))
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[derive(Debug, Clone)]
enum StatusLine {
    Localized(&'static str),
    Verbatim(String),
}

pub struct Session {
    config: SessionConfig,
    bridge: Bridge,
    bus: Arc<EventBus>,
    job: JobStateMachine,
    clock: ElapsedClock,
    locale: LocaleController,
    theme: ThemeController,
    viewport: ViewportScaler,
    sync: SettingsSynchronizer,
    notifications: NotificationCenter,
    status: StatusLine,
    progress: f32,
    open_result: Option<PathBuf>,
    timer_visible: bool,
    ready_announced: bool,
    finished: bool,
    handle: SessionHandle,
    receiver: mpsc::UnboundedReceiver<SessionEvent>,
}

impl Session {
    pub fn new(config: SessionConfig, backend: Arc<dyn Backend>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            bridge: Bridge::new(backend, Duration::from_millis(config.bridge.timeout_ms)),
            bus: Arc::new(EventBus::new()),
            job: JobStateMachine::new(),
            clock: ElapsedClock::new(),
            locale: LocaleController::default(),
            theme: ThemeController::new(),
            viewport: ViewportScaler::new(&config.viewport),
            sync: SettingsSynchronizer::new(),
            notifications: NotificationCenter::new(config.notifications.clone()),
            status: StatusLine::Localized("status.idle"),
            progress: 0.0,
            open_result: None,
            timer_visible: false,
            ready_announced: false,
            finished: false,
            handle: SessionHandle { sender },
            receiver,
            config,
        }
    }

    /// Publish session events on an existing bus
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = bus;
        self
    }

    /// Restore persisted settings without committing them
    pub fn load_settings(&mut self, snapshot: &SettingsSnapshot) {
        self.sync
            .load(snapshot, &mut self.theme, &mut self.locale);
        tracing::info!(
            "Settings loaded (tab {}, theme {}, language {})",
            snapshot.active_tab,
            snapshot.theme,
            snapshot.language
        );
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.bus)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn job(&self) -> &JobStateMachine {
        &self.job
    }

    pub fn clock(&self) -> &ElapsedClock {
        &self.clock
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Snapshot the next commit would carry
    pub fn snapshot(&self) -> SettingsSnapshot {
        self.sync.build_snapshot(&self.theme, &self.locale)
    }

    /// Whether the session has ended
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Wait for the next queued event
    ///
    /// Cancel safe, so hosts can race it against their own input sources
    /// in `tokio::select!` and pass the result to [`Session::handle_event`].
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        if self.finished {
            return None;
        }
        self.receiver.recv().await
    }

    /// Process events until shutdown or until the window closes
    pub async fn run(&mut self) {
        tracing::info!("Session started");
        while let Some(event) = self.next_event().await {
            if !self.handle_event(event) {
                break;
            }
        }
        self.stop();
    }

    /// End the session and stop the clock
    pub fn stop(&mut self) {
        self.finished = true;
        self.clock.stop();
        tracing::info!("Session ended");
    }

    /// Handle every event that is ready, letting spawned bridge calls run first
    ///
    /// Returns the number of events handled.
    pub async fn settle(&mut self) -> usize {
        let mut handled = 0;
        while !self.finished {
            for _ in 0..SETTLE_YIELDS {
                tokio::task::yield_now().await;
            }
            match self.receiver.try_recv() {
                Ok(event) => {
                    handled += 1;
                    self.handle_event(event);
                }
                Err(_) => break,
            }
        }
        handled
    }

    /// Apply one event; returns `false` once the session should end
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Operator(input) => self.on_operator(input),
            SessionEvent::Backend(event) => self.on_backend(event),
            SessionEvent::Bridge(outcome) => self.on_bridge(outcome),
            SessionEvent::Tick { generation } => {
                self.clock.on_tick(generation);
            }
            SessionEvent::Resize { width, height } => {
                if let Some(scale) = self.viewport.recompute(width, height) {
                    self.publish(AppEvent::Ui(UiEvent::ScaleChanged { scale }));
                }
            }
            SessionEvent::ToastExpired { id } => {
                self.notifications.dismiss(id);
            }
            SessionEvent::BridgeReady => self.on_bridge_ready(),
            SessionEvent::Shutdown => {
                tracing::info!("Shutdown requested");
                self.finished = true;
            }
        }
        !self.finished
    }

    /// Current observable state
    pub fn view(&self) -> ViewState {
        let language = self.locale.language();
        let action = self.job.action_content(language);
        ViewState {
            language,
            direction: self.locale.direction(),
            text_nodes: self.locale.nodes().to_vec(),
            theme_marker: self.theme.marker(),
            active_theme_selector: self.theme.active_selector().map(|s| s.class_name()),
            job_state: self.job.state(),
            action_icon: action.icon,
            action_label: action.label,
            action_enabled: self.job.is_enabled(),
            status_line: self.status_text(),
            timer_text: self.clock.display(),
            timer_visible: self.timer_visible,
            open_result: self.open_result.clone(),
            progress: self.progress,
            source: self.sync.panel().source().to_string(),
            active_tab: self.sync.panel().active_tab().to_string(),
            zoom: self.viewport.scale(),
            toasts: self.notifications.open().cloned().collect(),
        }
    }

    fn on_operator(&mut self, input: OperatorInput) {
        match input {
            OperatorInput::Trigger => self.on_trigger(),
            OperatorInput::Browse => self.spawn_bridge(|bridge| async move {
                BridgeOutcome::FolderSelected(bridge.select_folder().await)
            }),
            OperatorInput::OpenResult => match self.open_result.clone() {
                Some(path) => self.spawn_bridge(move |bridge| async move {
                    let result = bridge.open_file_explorer(&path).await;
                    BridgeOutcome::Acknowledged {
                        operation: Operation::OpenFileExplorer,
                        result,
                    }
                }),
                None => tracing::debug!("No result to open"),
            },
            OperatorInput::Minimize => self.spawn_bridge(|bridge| async move {
                BridgeOutcome::Acknowledged {
                    operation: Operation::MinimizeWindow,
                    result: bridge.minimize_window().await,
                }
            }),
            OperatorInput::Close => {
                tracing::info!("Closing window");
                self.spawn_bridge(|bridge| async move {
                    BridgeOutcome::Acknowledged {
                        operation: Operation::CloseWindow,
                        result: bridge.close_window().await,
                    }
                });
            }
            OperatorInput::SetSource(source) => {
                self.set_source(source);
                self.commit();
            }
            OperatorInput::SwitchTab(tab) => {
                self.sync.panel_mut().set_active_tab(tab.clone());
                self.publish(AppEvent::Ui(UiEvent::TabSwitched { tab }));
                self.commit();
            }
            OperatorInput::Control(change) => {
                self.sync.apply(change);
                self.commit();
            }
            OperatorInput::SetLanguage(language) => {
                let direction = self.locale.set_language(language);
                self.publish(AppEvent::Settings(SettingsEvent::LanguageChanged {
                    language: language.to_string(),
                    direction: direction.to_string(),
                }));
                self.commit();
            }
            OperatorInput::SetTheme(theme) => {
                self.theme.set_theme(theme);
                self.publish(AppEvent::Settings(SettingsEvent::ThemeChanged {
                    theme: theme.to_string(),
                }));
                self.commit();
            }
        }
    }

    fn on_trigger(&mut self) {
        let mode = JobMode::for_tab(self.sync.panel().active_tab());
        match self.job.trigger(self.sync.panel().source()) {
            Trigger::Ignored(reason) => tracing::debug!("Trigger ignored ({:?})", reason),
            Trigger::Rejected(err) => {
                tracing::info!("Trigger rejected: {}", err);
                self.notify_error_key(err.message_key());
            }
            Trigger::Verify(path) => {
                tracing::debug!("Verifying source {}", path.display());
                self.spawn_bridge(move |bridge| async move {
                    let result = bridge.is_directory(&path).await;
                    BridgeOutcome::SourceChecked { path, mode, result }
                });
            }
            Trigger::Command {
                command,
                transition,
            } => {
                self.apply_transition(transition);
                self.dispatch(command);
            }
        }
    }

    fn on_backend(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Completed { output_path } => {
                let transition = self.job.complete();
                self.apply_transition(transition);
                self.status = StatusLine::Localized("status.done");
                tracing::info!("Job completed: {}", output_path.display());
                self.open_result = Some(output_path.clone());
                self.publish(AppEvent::Job(JobEvent::Completed { output_path }));
            }
            BackendEvent::SetActionEnabled(enabled) => {
                self.job.set_enabled(enabled);
                self.publish(AppEvent::Job(JobEvent::ActionEnabled(enabled)));
            }
            BackendEvent::RefreshLabels => self.locale.render(),
            BackendEvent::Status(text) => self.status = StatusLine::Verbatim(text),
            BackendEvent::Progress(percent) => {
                if !percent.is_finite() {
                    tracing::debug!("Ignoring progress {}", percent);
                    return;
                }
                let percent = (percent.clamp(0.0, 100.0) * 100.0).round() / 100.0;
                self.progress = percent;
                self.publish(AppEvent::Ui(UiEvent::ProgressChanged { percent }));
            }
            BackendEvent::Notify { level, message } => self.notify(level, message),
            BackendEvent::ClearSource => self.set_source(String::new()),
        }
    }

    fn on_bridge(&mut self, outcome: BridgeOutcome) {
        match outcome {
            BridgeOutcome::SourceChecked { path, mode, result } => {
                self.on_source_checked(path, mode, result)
            }
            BridgeOutcome::Command { command, result } => self.on_command_result(command, result),
            BridgeOutcome::SettingsSaved { sequence, result } => match result {
                Ok(()) => tracing::debug!("Settings commit #{} saved", sequence),
                Err(e) => {
                    tracing::warn!("Settings commit #{} not saved: {}", sequence, e);
                    self.publish(AppEvent::Settings(SettingsEvent::CommitFailed {
                        reason: e.to_string(),
                    }));
                    self.notify_error_key("error.settings_not_saved");
                }
            },
            BridgeOutcome::FolderSelected(result) => match result {
                Ok(Some(path)) => {
                    self.set_source(path.display().to_string());
                    self.commit();
                }
                Ok(None) => tracing::debug!("Folder selection cancelled"),
                Err(e) => {
                    tracing::warn!("{}", e);
                    self.notify_error_key(e.message_key());
                }
            },
            BridgeOutcome::Acknowledged { operation, result } => {
                if let Err(e) = result {
                    tracing::warn!("{}", e);
                    self.notify_error_key(e.message_key());
                }
                if operation == Operation::CloseWindow {
                    self.finished = true;
                }
            }
        }
    }

    fn on_source_checked(
        &mut self,
        path: PathBuf,
        mode: JobMode,
        result: Result<bool, BridgeError>,
    ) {
        match self.job.confirm_source(path, mode, result) {
            SourceCheck::Start {
                command,
                transition,
            } => {
                if let JobCommand::Start { source, mode } = &command {
                    tracing::info!("Starting {} job on {}", mode, source.display());
                    self.publish(AppEvent::Job(JobEvent::Started {
                        source: source.clone(),
                        mode: *mode,
                    }));
                }
                self.clock.reset();
                self.timer_visible = true;
                self.open_result = None;
                self.progress = 0.0;
                self.apply_transition(transition);
                self.dispatch(command);
            }
            SourceCheck::Rejected(err) => {
                tracing::info!("Source rejected: {}", err);
                self.notify_error_key(err.message_key());
            }
            SourceCheck::Failed(err) => {
                tracing::warn!("Source check failed: {}", err);
                self.notify_error_key(err.message_key());
            }
            SourceCheck::Stale => tracing::debug!("Discarding stale source check"),
        }
    }

    fn on_command_result(&mut self, command: JobCommand, result: Result<(), BridgeError>) {
        let Err(e) = result else {
            tracing::debug!("{} acknowledged", command.operation());
            return;
        };

        tracing::warn!("{}", e);
        self.publish(AppEvent::Job(JobEvent::CommandFailed {
            operation: e.operation().to_string(),
            reason: e.to_string(),
        }));
        if let Some(transition) = self.job.command_failed(&command) {
            if matches!(command, JobCommand::Start { .. }) {
                self.timer_visible = false;
            }
            self.apply_transition(transition);
        }
        self.notify_error_key(e.message_key());
    }

    fn on_bridge_ready(&mut self) {
        if self.ready_announced {
            tracing::debug!("Bridge already announced ready");
            return;
        }
        self.ready_announced = true;
        self.spawn_bridge(|bridge| async move {
            BridgeOutcome::Acknowledged {
                operation: Operation::AppReady,
                result: bridge.app_ready().await,
            }
        });
    }

    fn apply_transition(&mut self, transition: Transition) {
        if transition.is_change() {
            self.publish(AppEvent::Job(JobEvent::StateChanged {
                from: transition.from,
                to: transition.to,
            }));
        }
        if let Some(key) = status_key(transition.to) {
            self.status = StatusLine::Localized(key);
        }
        self.sync_clock();
    }

    /// Start or stop the ticking source to match the job state
    fn sync_clock(&mut self) {
        let should_run = match self.job.state() {
            JobState::Idle => false,
            JobState::Processing | JobState::Busy => true,
            JobState::Paused => !self.config.clock.pauses_with_job,
        };
        if should_run && !self.clock.is_running() {
            let handle = self.handle.clone();
            self.clock
                .start(move |generation| handle.send(SessionEvent::Tick { generation }));
        } else if !should_run && self.clock.is_running() {
            self.clock.stop();
        }
    }

    fn dispatch(&self, command: JobCommand) {
        tracing::info!("Sending {}", command.operation());
        self.spawn_bridge(move |bridge| async move {
            let result = match &command {
                JobCommand::Start { source, mode } => bridge.start(*mode, source).await,
                JobCommand::Pause => bridge.pause_processing().await,
                JobCommand::Resume => bridge.resume_processing().await,
            };
            BridgeOutcome::Command { command, result }
        });
    }

    fn commit(&mut self) {
        let Commit { sequence, snapshot } = self.sync.commit(&self.theme, &self.locale);
        self.publish(AppEvent::Settings(SettingsEvent::Committed { sequence }));
        self.spawn_bridge(move |bridge| async move {
            let result = bridge.save_settings(&snapshot).await;
            BridgeOutcome::SettingsSaved { sequence, result }
        });
    }

    fn set_source(&mut self, source: String) {
        self.sync.panel_mut().set_source(source.clone());
        self.publish(AppEvent::Ui(UiEvent::SourceChanged { source }));
    }

    fn notify(&mut self, level: ToastLevel, message: String) {
        let title = self.locale.message(match level {
            ToastLevel::Success => "toast.success_title",
            ToastLevel::Error => "toast.error_title",
        });
        let id = self.notifications.show(level, title, message.clone());
        let event = match level {
            ToastLevel::Success => NotificationEvent::Success { message },
            ToastLevel::Error => NotificationEvent::Error { message },
        };
        self.publish(AppEvent::Notification(event));

        let handle = self.handle.clone();
        let duration = self.notifications.duration();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            handle.send(SessionEvent::ToastExpired { id });
        });
    }

    fn notify_error_key(&mut self, key: &str) {
        let message = self.locale.message(key);
        self.notify(ToastLevel::Error, message);
    }

    fn status_text(&self) -> String {
        match &self.status {
            StatusLine::Localized(key) => self.locale.message(key),
            StatusLine::Verbatim(text) => text.clone(),
        }
    }

    fn spawn_bridge<F, Fut>(&self, call: F)
    where
        F: FnOnce(Bridge) -> Fut,
        Fut: Future<Output = BridgeOutcome> + Send + 'static,
    {
        let outcome = call(self.bridge.clone());
        let handle = self.handle.clone();
        tokio::spawn(async move {
            let outcome = outcome.await;
            if !handle.send(SessionEvent::Bridge(outcome)) {
                tracing::debug!("Session gone, dropping bridge outcome");
            }
        });
    }

    fn publish(&self, event: AppEvent) {
        let delivery = self.bus.publish(event);
        if delivery.is_unobserved() {
            tracing::trace!("Event #{} unobserved", delivery.sequence);
        }
    }
}
