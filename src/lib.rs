//! # PhotoSlicer
//!
//! Stitches every image of a folder vertically and slices the result into
//! fixed-height pieces. This workspace holds the client-side coordination
//! layer: the job lifecycle, settings synchronisation, the elapsed-time
//! clock, localisation and theming, viewport scaling and notifications.
//!
//! ## Architecture
//!
//! PhotoSlicer is organized as a workspace with multiple crates:
//!
//! 1. **photoslicer-core** - Job types, errors, event bus, elapsed-time clock
//! 2. **photoslicer-settings** - Settings snapshot, control panel, session config, persistence
//! 3. **photoslicer-ui** - Session loop, controllers, backend bridge
//! 4. **photoslicer** - Main binary with the local backend and operator console

pub mod backend;
pub mod console;

pub use photoslicer_core::{
    AppEvent, BridgeError, ElapsedClock, ElapsedTime, Error, EventBus, EventCategory,
    EventFilter, JobEvent, JobMode, JobState, NotificationEvent, Result, SettingsEvent,
    UiEvent, ValidationError,
};

pub use photoslicer_settings::{
    ControlChange, ControlPanel, Direction, LanguageId, SaveFormat, SessionConfig,
    SettingsManager, SettingsPersistence, SettingsSnapshot, ThemeId,
};

pub use photoslicer_ui::{
    Backend, BackendEvent, Bridge, NotificationCenter, Operation, OperatorInput, Session,
    SessionEvent, SessionHandle, Toast, ToastLevel, ViewState,
};

pub use backend::LocalBackend;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty formatting on stderr, leaving stdout to the console
/// - RUST_LOG environment variable support
/// - `info` as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
