use std::time::{Duration, Instant};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Reveals a title one character per interval.
///
/// Only runs when explicitly enabled; the default start-up path shows titles
/// in full.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    started: Instant,
    interval: Duration,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, started: Instant) -> Self {
        Self::with_interval(text, started, DEFAULT_INTERVAL)
    }

    pub fn with_interval(text: impl Into<String>, started: Instant, interval: Duration) -> Self {
        Self {
            text: text.into(),
            started,
            interval,
        }
    }

    /// Number of characters revealed at `now`.
    pub fn revealed_chars(&self, now: Instant) -> usize {
        let elapsed = now.saturating_duration_since(self.started);
        let ticks = if self.interval.is_zero() {
            usize::MAX
        } else {
            (elapsed.as_nanos() / self.interval.as_nanos()) as usize
        };
        ticks.min(self.text.chars().count())
    }

    /// The visible prefix at `now`, always cut on a character boundary.
    pub fn visible(&self, now: Instant) -> &str {
        let n = self.revealed_chars(now);
        match self.text.char_indices().nth(n) {
            Some((byte, _)) => &self.text[..byte],
            None => &self.text,
        }
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.revealed_chars(now) == self.text.chars().count()
    }
}
