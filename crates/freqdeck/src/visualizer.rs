use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_BAR_COUNT: usize = 24;
/// Height of every bar while the music is stopped.
pub const MIN_BAR_HEIGHT: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Idle,
    Running,
}

/// Simulated audio visualizer.
///
/// Runs as a per-frame task: the window polls [`Visualizer::frame`] on every
/// repaint once the task has been started. Starting an already running task
/// is a no-op, so repeated play requests never stack loops. While the music is
/// stopped the task keeps running with flat bars so it picks up a later start.
pub struct Visualizer<R: Rng = StdRng> {
    state: TaskState,
    heights: Vec<f32>,
    rng: R,
}

impl Visualizer<StdRng> {
    pub fn new(bar_count: usize) -> Self {
        Self::with_rng(bar_count, StdRng::from_os_rng())
    }
}

impl<R: Rng> Visualizer<R> {
    pub fn with_rng(bar_count: usize, rng: R) -> Self {
        Self {
            state: TaskState::Idle,
            heights: vec![MIN_BAR_HEIGHT; bar_count],
            rng,
        }
    }

    /// Returns `false` when the task was already running.
    pub fn start(&mut self) -> bool {
        if self.state == TaskState::Running {
            return false;
        }
        tracing::debug!(bars = self.heights.len(), "visualizer started");
        self.state = TaskState::Running;
        true
    }

    pub fn stop(&mut self) {
        self.state = TaskState::Idle;
        self.heights.fill(MIN_BAR_HEIGHT);
    }

    pub fn is_running(&self) -> bool {
        self.state == TaskState::Running
    }

    /// Advance one frame. `time_secs` is wall-clock seconds, `playing` the
    /// media controller's flag. Yields `None` when the task is not running.
    pub fn frame(&mut self, time_secs: f64, playing: bool) -> Option<&[f32]> {
        if self.state != TaskState::Running {
            return None;
        }
        if !playing {
            self.heights.fill(MIN_BAR_HEIGHT);
            return Some(&self.heights);
        }
        for (i, height) in self.heights.iter_mut().enumerate() {
            let wave = (time_secs * 3.0 + i as f64 * 0.5).sin() * 25.0;
            let jitter = self.rng.random::<f64>() * 20.0;
            *height = (10.0 + wave + jitter) as f32;
        }
        Some(&self.heights)
    }
}
