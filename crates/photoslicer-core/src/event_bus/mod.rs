//! # Event Bus Module
//!
//! Typed session events and the bus that carries them to hosts, loggers
//! and tests. Observers filter by category; async tasks can take a
//! broadcast receiver instead.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use photoslicer_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter, JobEvent};
//!
//! let bus = EventBus::new();
//! let observer = bus.subscribe(EventFilter::only(EventCategory::Job), |event| {
//!     println!("{}", event.description())
//! });
//!
//! let delivery = bus.publish(AppEvent::Job(JobEvent::ActionEnabled(false)));
//! assert_eq!(delivery.observers, 1);
//! bus.unsubscribe(observer);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
