//! Session event bus
//!
//! Fans [`AppEvent`]s out to synchronous observers and async receivers.
//! Observers run in subscription order on the publishing task. Every event
//! gets a sequence number, and a bounded journal keeps the latest ones so an
//! observer attached late can catch up.

use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{AppEvent, EventCategory};

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self.0.simple().to_string();
        write!(f, "obs-{}", &id[..8])
    }
}

/// Which events an observer wants
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventFilter {
    #[default]
    All,
    /// Only events of these categories
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn only(category: EventCategory) -> Self {
        EventFilter::Categories(vec![category])
    }

    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

/// Bus sizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBusConfig {
    /// Events buffered per async receiver before it lags
    pub channel_capacity: usize,
    /// Events kept in the journal; `0` disables it
    pub journal_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 128,
            journal_size: 0,
        }
    }
}

/// A published event with its position in the stream
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub sequence: u64,
    pub published_at: Instant,
    pub event: AppEvent,
}

/// Who saw a published event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub sequence: u64,
    pub observers: usize,
    pub receivers: usize,
}

impl Delivery {
    /// Nobody was listening
    pub fn is_unobserved(&self) -> bool {
        self.observers == 0 && self.receivers == 0
    }
}

struct Observer {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Box<dyn Fn(&AppEvent) + Send + Sync>,
}

pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
    observers: RwLock<Vec<Observer>>,
    journal: Mutex<VecDeque<JournalEntry>>,
    last_sequence: AtomicU64,
    config: EventBusConfig,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            observers: RwLock::new(Vec::new()),
            journal: Mutex::new(VecDeque::with_capacity(config.journal_size)),
            last_sequence: AtomicU64::new(0),
            config,
        }
    }

    /// Deliver `event` to every matching observer, then to async receivers
    pub fn publish(&self, event: AppEvent) -> Delivery {
        let sequence = self.last_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!("Event #{}: {}", sequence, event.description());

        if self.config.journal_size > 0 {
            let mut journal = self.journal.lock();
            if journal.len() == self.config.journal_size {
                journal.pop_front();
            }
            journal.push_back(JournalEntry {
                sequence,
                published_at: Instant::now(),
                event: event.clone(),
            });
        }

        let observers = {
            let observers = self.observers.read();
            let mut delivered = 0;
            for observer in observers.iter().filter(|o| o.filter.matches(&event)) {
                (observer.handler)(&event);
                delivered += 1;
            }
            delivered
        };
        let receivers = self.sender.send(event).unwrap_or(0);

        Delivery {
            sequence,
            observers,
            receivers,
        }
    }

    /// Register a synchronous observer
    ///
    /// The handler runs on the publishing task and must not publish on the
    /// same bus.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.observers.write().push(Observer {
            id,
            filter,
            handler: Box::new(handler),
        });
        tracing::debug!("Observer {} attached", id);
        id
    }

    /// Returns `false` when `id` was not attached
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|observer| observer.id != id);
        let removed = observers.len() != before;
        if removed {
            tracing::debug!("Observer {} detached", id);
        }
        removed
    }

    /// Receiver for consuming events from an async task
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    /// Sequence number of the latest published event, `0` before the first
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence.load(Ordering::SeqCst)
    }

    /// Journal entries published after `sequence`
    pub fn journal_since(&self, sequence: u64) -> Vec<JournalEntry> {
        self.journal
            .lock()
            .iter()
            .filter(|entry| entry.sequence > sequence)
            .cloned()
            .collect()
    }

    pub fn clear_journal(&self) {
        self.journal.lock().clear();
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observer_count())
            .field("last_sequence", &self.last_sequence())
            .field("config", &self.config)
            .finish()
    }
}
