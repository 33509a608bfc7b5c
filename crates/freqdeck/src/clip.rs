use std::time::Instant;

use crate::trim::{Playhead, TrimController};

/// Wall-clock playhead for a slide's video clip.
///
/// There is no decoder behind it: the clip is drawn as a poster frame with a
/// timeline, and the position advances in real time while playing. The trim
/// controller is attached so the clip behaves like the trimmed video would.
#[derive(Debug, Clone)]
pub struct ClipPlayer {
    duration: f64,
    position: f64,
    playing_since: Option<Instant>,
    trim: TrimController,
}

impl ClipPlayer {
    /// Create a player and fire the metadata hook, which seeks to the trim start.
    pub fn new(duration: f64, trim: TrimController) -> Self {
        let mut player = Self {
            duration: duration.max(0.0),
            position: 0.0,
            playing_since: None,
            trim,
        };
        trim.on_loaded_metadata(&mut player);
        player
    }

    pub fn is_playing(&self) -> bool {
        self.playing_since.is_some()
    }

    pub fn trim(&self) -> &TrimController {
        &self.trim
    }

    pub fn play(&mut self, now: Instant) {
        if self.is_playing() {
            return;
        }
        let trim = self.trim;
        trim.on_play(self);
        self.playing_since = Some(now);
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.is_playing() {
            self.pause_at(now);
        } else {
            self.play(now);
        }
    }

    pub fn pause_at(&mut self, now: Instant) {
        self.advance(now);
        self.playing_since = None;
    }

    /// Fold elapsed wall time into the position, then run the time-update hook.
    pub fn tick(&mut self, now: Instant) {
        if !self.is_playing() {
            return;
        }
        self.advance(now);
        let trim = self.trim;
        if trim.on_time_update(self) {
            tracing::debug!(position = self.position, "clip reached trim end");
        }
    }

    /// Playback position as a 0..=1 fraction of the full clip.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.position / self.duration).clamp(0.0, 1.0) as f32
    }

    fn advance(&mut self, now: Instant) {
        if let Some(since) = self.playing_since {
            let elapsed = now.saturating_duration_since(since).as_secs_f64();
            self.position = (self.position + elapsed).min(self.duration);
            self.playing_since = Some(now);
        }
    }
}

impl Playhead for ClipPlayer {
    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, secs: f64) {
        self.position = secs.clamp(0.0, self.duration);
    }

    fn duration(&self) -> Option<f64> {
        Some(self.duration)
    }

    fn pause(&mut self) {
        self.playing_since = None;
    }
}
