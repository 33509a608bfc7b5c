pub mod backend;

use std::time::{Duration, Instant};

use crate::oneshot::{Delivery, Gesture, OneShot};
use crate::visualizer::Visualizer;

const PROMPT_DURATION: Duration = Duration::from_secs(3);

/// Result of asking a sink to start playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    /// Playback is not possible right now (no device, no track, ...).
    Blocked(String),
}

impl PlayOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

/// Something that can play the background track.
pub trait AudioSink {
    fn play(&mut self, volume: f32) -> PlayOutcome;
    fn pause(&mut self);
}

/// Glyph shown on the music button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicIcon {
    Playing,
    Muted,
}

impl MusicIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Playing => "\u{1F50A}",
            Self::Muted => "\u{1F507}",
        }
    }
}

/// Owns the "music is playing" flag and everything that reflects it: the
/// button icon, the attention pulse, the gesture retry, and the visualizer.
pub struct MediaController<S: AudioSink> {
    sink: S,
    volume: f32,
    playing: bool,
    retry: OneShot,
    pulse_until: Option<Instant>,
    visualizer: Visualizer,
}

impl<S: AudioSink> MediaController<S> {
    pub fn new(sink: S, volume: f32, visualizer: Visualizer) -> Self {
        Self {
            sink,
            volume: volume.clamp(0.0, 1.0),
            playing: false,
            retry: OneShot::new(),
            pulse_until: None,
            visualizer,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn icon(&self) -> MusicIcon {
        if self.playing {
            MusicIcon::Playing
        } else {
            MusicIcon::Muted
        }
    }

    /// Whether a gesture retry is waiting for the first click or key press.
    pub fn awaiting_gesture(&self) -> bool {
        self.retry.is_armed()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn visualizer(&self) -> &Visualizer {
        &self.visualizer
    }

    /// Try to start the music. When the sink refuses, fall back to the muted
    /// state and wait for the next click or key press to try again.
    pub fn start(&mut self) -> PlayOutcome {
        self.visualizer.start();
        let outcome = self.sink.play(self.volume);
        match &outcome {
            PlayOutcome::Started => {
                self.playing = true;
                self.retry.unsubscribe();
                tracing::info!("music started");
            }
            PlayOutcome::Blocked(reason) => {
                self.playing = false;
                tracing::info!("music play blocked: {reason}");
                self.retry.subscribe(&[Gesture::Click, Gesture::KeyDown]);
            }
        }
        outcome
    }

    /// Pause when playing, otherwise start. Returns the new playing state.
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.sink.pause();
            self.playing = false;
            tracing::debug!("music paused");
        } else {
            self.start();
        }
        self.playing
    }

    /// Route a user gesture to the pending retry, if any.
    pub fn on_gesture(&mut self, gesture: Gesture) -> Delivery {
        if self.playing || !self.retry.listens_to(gesture) {
            return Delivery::Ignored;
        }
        self.visualizer.start();
        let volume = self.volume;
        let sink = &mut self.sink;
        let delivery = self
            .retry
            .deliver(gesture, || sink.play(volume).is_started());
        if delivery == Delivery::Completed {
            self.playing = true;
            tracing::info!(?gesture, "music started after user gesture");
        }
        delivery
    }

    /// Pulse the music button for a few seconds to draw attention to it.
    pub fn prompt(&mut self, now: Instant) {
        self.pulse_until = Some(now + PROMPT_DURATION);
    }

    pub fn is_pulsing(&self, now: Instant) -> bool {
        self.pulse_until.is_some_and(|until| now < until)
    }

    /// Poll the visualizer task with the current playing flag.
    pub fn visualizer_frame(&mut self, time_secs: f64) -> Option<&[f32]> {
        self.visualizer.frame(time_secs, self.playing)
    }

    /// Start the visualizer without touching the sink (muted sessions).
    pub fn start_visualizer(&mut self) -> bool {
        self.visualizer.start()
    }

    pub fn stop_visualizer(&mut self) {
        self.visualizer.stop();
    }
}
