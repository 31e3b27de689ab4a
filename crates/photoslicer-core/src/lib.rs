//! # PhotoSlicer Core
//!
//! Core types, errors, and utilities for PhotoSlicer.
//! Provides the job lifecycle types, the error taxonomy of the
//! coordination layer, the session event bus, and the elapsed-time clock.

pub mod clock;
pub mod error;
pub mod event_bus;
pub mod types;

pub use clock::{ElapsedClock, ElapsedTime, ZERO_DISPLAY};

pub use error::{BridgeError, Error, Result, ValidationError};

pub use event_bus::{
    AppEvent, Delivery, EventBus, EventBusConfig, EventCategory, EventFilter, JobEvent,
    JournalEntry, NotificationEvent, SettingsEvent, SubscriptionId, UiEvent,
};

pub use types::{JobMode, JobState};
