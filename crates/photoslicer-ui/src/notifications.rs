//! Notification facade
//!
//! Transient success and error toasts. Only queueing is handled here: at
//! most `max_opened` toasts are visible, the oldest making room for a new
//! one, and each toast is dismissed once its display duration elapses.

use photoslicer_settings::{NotificationSettings, ToastPosition};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct NotificationCenter {
    settings: NotificationSettings,
    open: VecDeque<Toast>,
    next_id: u64,
    shown_errors: u64,
    shown_successes: u64,
}

impl NotificationCenter {
    pub fn new(settings: NotificationSettings) -> Self {
        Self {
            settings,
            open: VecDeque::new(),
            next_id: 1,
            shown_errors: 0,
            shown_successes: 0,
        }
    }

    /// Show a toast and return its id
    pub fn show(
        &mut self,
        level: ToastLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> u64 {
        let toast = Toast {
            id: self.next_id,
            level,
            title: title.into(),
            message: message.into(),
        };
        self.next_id += 1;

        match level {
            ToastLevel::Success => self.shown_successes += 1,
            ToastLevel::Error => self.shown_errors += 1,
        }
        tracing::debug!("Toast #{} {}: {}", toast.id, toast.title, toast.message);

        while self.open.len() >= self.settings.max_opened.max(1) {
            self.open.pop_front();
        }
        let id = toast.id;
        self.open.push_back(toast);
        id
    }

    /// Dismiss a toast; returns `false` if it was already gone
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.open.len();
        self.open.retain(|toast| toast.id != id);
        self.open.len() != before
    }

    /// Visible toasts, oldest first
    pub fn open(&self) -> impl Iterator<Item = &Toast> {
        self.open.iter()
    }

    /// How long each toast stays visible
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.settings.duration_ms)
    }

    pub fn position(&self) -> ToastPosition {
        self.settings.position
    }

    /// Error toasts shown since the session started
    pub fn error_count(&self) -> u64 {
        self.shown_errors
    }

    /// Success toasts shown since the session started
    pub fn success_count(&self) -> u64 {
        self.shown_successes
    }
}
