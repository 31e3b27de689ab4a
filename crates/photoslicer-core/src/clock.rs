//! Elapsed-time clock
//!
//! A free-running stopwatch shown while a job runs. The ticking source is a
//! tokio interval task that reports each tick through a caller-supplied sink;
//! the owner feeds the tick back through [`ElapsedClock::on_tick`] so all
//! mutation happens on the owner's task.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};

/// Text shown by a freshly reset clock
pub const ZERO_DISPLAY: &str = "00:00:00";

/// Elapsed wall time as hours, minutes and seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElapsedTime {
    pub hours: u32,
    pub minutes: u8,
    pub seconds: u8,
}

impl ElapsedTime {
    /// Create a time value, returning `None` when minutes or seconds exceed 59
    pub fn new(hours: u32, minutes: u8, seconds: u8) -> Option<Self> {
        if minutes > 59 || seconds > 59 {
            return None;
        }
        Some(Self {
            hours,
            minutes,
            seconds,
        })
    }

    /// Advance by one second, carrying into minutes and hours
    pub fn advance(&mut self) {
        self.seconds += 1;
        if self.seconds >= 60 {
            self.seconds = 0;
            self.minutes += 1;
            if self.minutes >= 60 {
                self.minutes = 0;
                self.hours = self.hours.saturating_add(1);
            }
        }
    }

    /// Total number of seconds represented
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Stopwatch owning the elapsed time and its ticking source
pub struct ElapsedClock {
    elapsed: ElapsedTime,
    running: bool,
    /// Identifies the current ticking source; ticks from older sources are stale
    generation: u64,
    ticker: Option<JoinHandle<()>>,
    period: Duration,
}

impl ElapsedClock {
    /// Create a stopped clock ticking once per second
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    /// Create a stopped clock with a custom tick period
    pub fn with_period(period: Duration) -> Self {
        Self {
            elapsed: ElapsedTime::default(),
            running: false,
            generation: 0,
            ticker: None,
            period,
        }
    }

    /// Start ticking
    ///
    /// Any previous ticking source is cancelled first, so at most one source
    /// is ever live. `sink` receives the generation of every tick and returns
    /// `false` once nobody is listening, which ends the ticking task. Must be
    /// called from within a tokio runtime.
    pub fn start<F>(&mut self, sink: F)
    where
        F: Fn(u64) -> bool + Send + 'static,
    {
        self.cancel_ticker();
        self.generation += 1;
        self.running = true;

        let generation = self.generation;
        let period = self.period;
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !sink(generation) {
                    break;
                }
            }
        }));
        tracing::debug!("Clock started (generation {})", generation);
    }

    /// Stop ticking, keeping the elapsed time
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!("Clock stopped at {}", self.elapsed);
        }
        self.cancel_ticker();
        self.running = false;
    }

    /// Stop ticking and zero the elapsed time
    pub fn reset(&mut self) {
        self.stop();
        self.elapsed = ElapsedTime::default();
    }

    /// Apply a tick reported by the ticking source
    ///
    /// Returns `true` when the tick advanced the clock. Ticks from a
    /// cancelled source, or arriving while stopped, are discarded.
    pub fn on_tick(&mut self, generation: u64) -> bool {
        if !self.running || generation != self.generation {
            tracing::trace!(
                "Discarding stale tick (generation {}, current {})",
                generation,
                self.generation
            );
            return false;
        }
        self.tick();
        true
    }

    /// Advance the clock by one second
    pub fn tick(&mut self) {
        self.elapsed.advance();
    }

    /// Current elapsed time
    pub fn elapsed(&self) -> ElapsedTime {
        self.elapsed
    }

    /// Whether a ticking source is live
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Generation of the current ticking source
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Zero-padded `HH:MM:SS` text
    pub fn display(&self) -> String {
        self.elapsed.to_string()
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Default for ElapsedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ElapsedClock {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

impl fmt::Debug for ElapsedClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElapsedClock")
            .field("elapsed", &self.elapsed)
            .field("running", &self.running)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_seconds_roll_into_minutes() {
        let mut time = ElapsedTime::new(0, 0, 59).unwrap();
        time.advance();
        assert_eq!(time, ElapsedTime::new(0, 1, 0).unwrap());
    }

    #[test]
    fn test_minutes_roll_into_hours() {
        let mut time = ElapsedTime::new(0, 59, 59).unwrap();
        time.advance();
        assert_eq!(time, ElapsedTime::new(1, 0, 0).unwrap());
    }

    #[test]
    fn test_hours_are_unbounded() {
        let mut time = ElapsedTime::new(99, 59, 59).unwrap();
        time.advance();
        assert_eq!(time.hours, 100);
        assert_eq!(time.to_string(), "100:00:00");
    }

    #[test]
    fn test_rejects_out_of_range_fields() {
        assert!(ElapsedTime::new(0, 60, 0).is_none());
        assert!(ElapsedTime::new(0, 0, 60).is_none());
    }

    #[test]
    fn test_display_is_zero_padded() {
        let time = ElapsedTime::new(1, 2, 3).unwrap();
        assert_eq!(time.to_string(), "01:02:03");
        assert_eq!(ElapsedTime::default().to_string(), ZERO_DISPLAY);
        assert_eq!(time.total_seconds(), 3723);
    }

    #[tokio::test]
    async fn test_reset_zeroes_and_stops() {
        let mut clock = ElapsedClock::new();
        clock.start(|_| true);
        let generation = clock.generation();
        assert!(clock.on_tick(generation));
        assert!(clock.on_tick(generation));
        assert_eq!(clock.display(), "00:00:02");

        clock.reset();
        assert!(!clock.is_running());
        assert_eq!(clock.display(), ZERO_DISPLAY);
    }

    #[tokio::test]
    async fn test_restart_discards_stale_ticks() {
        let mut clock = ElapsedClock::new();
        clock.start(|_| true);
        let first = clock.generation();
        clock.start(|_| true);
        let second = clock.generation();

        assert_ne!(first, second);
        assert!(!clock.on_tick(first));
        assert!(clock.on_tick(second));
        assert_eq!(clock.elapsed().seconds, 1);
    }

    #[tokio::test]
    async fn test_ticks_ignored_while_stopped() {
        let mut clock = ElapsedClock::new();
        clock.start(|_| true);
        let generation = clock.generation();
        clock.stop();
        assert!(!clock.on_tick(generation));
        assert_eq!(clock.elapsed(), ElapsedTime::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticking_source_reports_current_generation() {
        let seen = Arc::new(AtomicU64::new(0));
        let count = Arc::new(AtomicU64::new(0));
        let mut clock = ElapsedClock::new();

        let (s, c) = (seen.clone(), count.clone());
        clock.start(move |generation| {
            s.store(generation, Ordering::SeqCst);
            c.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(seen.load(Ordering::SeqCst), clock.generation());
        assert_eq!(count.load(Ordering::SeqCst), 3);

        clock.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
