use std::time::{Duration, Instant};

use eframe::egui;

use crate::indicators::Indicators;
use crate::slides::{SlideChange, SlideIndex};

pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;
pub const DEFAULT_WHEEL_COOLDOWN: Duration = Duration::from_millis(500);

/// A discrete navigation request produced by an input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Prev,
    First,
    Last,
    GoTo(usize),
}

impl NavCommand {
    /// Keyboard mapping. Keys without a navigation meaning return `None`.
    pub fn from_key(key: egui::Key) -> Option<Self> {
        use egui::Key;
        match key {
            Key::ArrowRight | Key::ArrowDown | Key::Space | Key::PageDown => Some(Self::Next),
            Key::ArrowLeft | Key::ArrowUp | Key::PageUp => Some(Self::Prev),
            Key::Home => Some(Self::First),
            Key::End => Some(Self::Last),
            _ => None,
        }
    }
}

/// Translates navigation commands into slide index changes and keeps the
/// indicators in step with the index.
#[derive(Debug, Clone)]
pub struct Navigator {
    index: SlideIndex,
    indicators: Indicators,
    activated_at: Option<Instant>,
}

impl Navigator {
    /// # Panics
    ///
    /// Panics if `total` is zero, like [`SlideIndex::new`].
    pub fn new(total: usize) -> Self {
        Self {
            index: SlideIndex::new(total),
            indicators: Indicators::new(total),
            activated_at: None,
        }
    }

    pub fn current(&self) -> usize {
        self.index.current()
    }

    pub fn total(&self) -> usize {
        self.index.total()
    }

    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }

    /// When the current slide last became active (None for the initial slide).
    pub fn activated_at(&self) -> Option<Instant> {
        self.activated_at
    }

    /// Jump to `index`. Out-of-range requests are ignored and return `false`.
    pub fn go_to_slide(&mut self, index: usize) -> bool {
        let Some(SlideChange { from, to }) = self.index.set(index) else {
            return false;
        };
        if from != to {
            tracing::debug!(from, to, "slide changed");
            self.activated_at = Some(Instant::now());
        }
        self.indicators.update_nav_dots(to);
        self.indicators.update_progress(to);
        true
    }

    pub fn next_slide(&mut self) -> bool {
        if self.index.is_last() {
            return false;
        }
        self.go_to_slide(self.index.current() + 1)
    }

    pub fn prev_slide(&mut self) -> bool {
        if self.index.is_first() {
            return false;
        }
        self.go_to_slide(self.index.current() - 1)
    }

    pub fn apply(&mut self, command: NavCommand) -> bool {
        match command {
            NavCommand::Next => self.next_slide(),
            NavCommand::Prev => self.prev_slide(),
            NavCommand::First => self.go_to_slide(0),
            NavCommand::Last => self.go_to_slide(self.index.last()),
            NavCommand::GoTo(i) => self.go_to_slide(i),
        }
    }
}

/// Horizontal swipe detection from touch start/end positions.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    start: Option<egui::Pos2>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start: None,
        }
    }

    pub fn touch_start(&mut self, pos: egui::Pos2) {
        self.start = Some(pos);
    }

    /// Finish a gesture. Only a mostly-horizontal drag longer than the
    /// threshold navigates; dragging left (content moving left) goes forward.
    pub fn touch_end(&mut self, pos: egui::Pos2) -> Option<NavCommand> {
        let start = self.start.take()?;
        let dx = start.x - pos.x;
        let dy = start.y - pos.y;
        if dx.abs() > dy.abs() && dx.abs() > self.threshold {
            Some(if dx > 0.0 {
                NavCommand::Next
            } else {
                NavCommand::Prev
            })
        } else {
            None
        }
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

/// Wheel navigation with a cooldown: the first event navigates, later events
/// are dropped until the cooldown has elapsed.
#[derive(Debug, Clone)]
pub struct WheelDebounce {
    cooldown: Duration,
    blocked_until: Option<Instant>,
}

impl WheelDebounce {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            blocked_until: None,
        }
    }

    /// `delta_y` uses the browser convention: positive means scrolling down.
    pub fn on_wheel(&mut self, delta_y: f32, now: Instant) -> Option<NavCommand> {
        if self.blocked_until.is_some_and(|until| now < until) {
            return None;
        }
        self.blocked_until = Some(now + self.cooldown);
        Some(if delta_y > 0.0 {
            NavCommand::Next
        } else {
            NavCommand::Prev
        })
    }
}

impl Default for WheelDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_WHEEL_COOLDOWN)
    }
}
