//! PhotoSlicer UI Crate
//!
//! The client-side coordination layer: a single session that owns the job
//! state machine, the settings synchronizer, the elapsed-time clock, the
//! locale, theme and viewport controllers, and the notification facade, and
//! talks to the backend only through the time-limited [`Bridge`].

pub mod bridge;
pub mod job;
pub mod locale;
pub mod notifications;
pub mod session;
pub mod sync;
pub mod theme;
pub mod view;
pub mod viewport;

pub use bridge::{Backend, Bridge, Operation};
pub use job::{
    status_key, ActionContent, ActionIcon, IgnoreReason, JobCommand, JobStateMachine,
    SourceCheck, Transition, Trigger,
};
pub use locale::{translate, LocaleController, TextNode};
pub use notifications::{NotificationCenter, Toast, ToastLevel};
pub use session::{
    BackendEvent, BridgeOutcome, OperatorInput, Session, SessionEvent, SessionHandle,
};
pub use sync::{Commit, SettingsSynchronizer};
pub use theme::{ThemeController, ThemeSelector};
pub use view::ViewState;
pub use viewport::ViewportScaler;
