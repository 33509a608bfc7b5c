use std::sync::LazyLock;

use regex::Regex;

/// Anything with a seekable playback position.
pub trait Playhead {
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, secs: f64);
    /// Total length in seconds, `None` until metadata is known.
    fn duration(&self) -> Option<f64>;
    fn pause(&mut self);
}

/// Seconds cut from the start and end of a clip.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrimWindow {
    pub start: f64,
    pub end: f64,
}

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").expect("valid regex")
});

/// The numeric prefix of `raw`, if it has one: `"2.5s"` is 2.5.
pub fn leading_number(raw: &str) -> Option<f64> {
    LEADING_NUMBER
        .captures(raw)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Read a trim offset attribute. Missing or non-numeric values are 0.
pub fn parse_offset(raw: Option<&str>) -> f64 {
    raw.and_then(leading_number).unwrap_or(0.0)
}

impl TrimWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Position at which playback stops and rewinds.
    pub fn stop_point(&self, duration: f64) -> f64 {
        duration - self.end
    }
}

/// Keeps a playhead inside its trim window. Call the `on_*` hooks from the
/// matching media events.
#[derive(Debug, Clone, Copy)]
pub struct TrimController {
    window: TrimWindow,
}

impl TrimController {
    pub fn new(window: TrimWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> TrimWindow {
        self.window
    }

    pub fn on_loaded_metadata(&self, media: &mut impl Playhead) {
        media.set_current_time(self.window.start);
    }

    pub fn on_play(&self, media: &mut impl Playhead) {
        if media.current_time() < self.window.start {
            media.set_current_time(self.window.start);
        }
    }

    /// Returns `true` when the playhead hit the end of the window and was rewound.
    pub fn on_time_update(&self, media: &mut impl Playhead) -> bool {
        let Some(duration) = media.duration() else {
            return false;
        };
        if media.current_time() >= self.window.stop_point(duration) {
            media.pause();
            media.set_current_time(self.window.start);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeVideo {
        time: f64,
        duration: Option<f64>,
        paused: bool,
    }

    impl Playhead for FakeVideo {
        fn current_time(&self) -> f64 {
            self.time
        }
        fn set_current_time(&mut self, secs: f64) {
            self.time = secs;
        }
        fn duration(&self) -> Option<f64> {
            self.duration
        }
        fn pause(&mut self) {
            self.paused = true;
        }
    }

    fn video(duration: f64) -> FakeVideo {
        FakeVideo {
            duration: Some(duration),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset(Some("2")), 2.0);
        assert_eq!(parse_offset(Some(" 2.5s")), 2.5);
        assert_eq!(parse_offset(Some(".5")), 0.5);
        assert_eq!(parse_offset(Some("-1")), -1.0);
        assert_eq!(parse_offset(Some("abc")), 0.0);
        assert_eq!(parse_offset(Some("")), 0.0);
        assert_eq!(parse_offset(None), 0.0);
        assert_eq!(leading_number("0s"), Some(0.0));
        assert_eq!(leading_number("s0"), None);
    }

    #[test]
    fn test_metadata_seeks_to_start() {
        let ctl = TrimController::new(TrimWindow::new(
            parse_offset(Some("2")),
            parse_offset(Some("1")),
        ));
        let mut v = video(10.0);
        ctl.on_loaded_metadata(&mut v);
        assert_eq!(v.time, 2.0);
    }

    #[test]
    fn test_reaching_end_pauses_and_rewinds() {
        let ctl = TrimController::new(TrimWindow::new(2.0, 1.0));
        let mut v = video(10.0);
        v.time = 8.9;
        assert!(!ctl.on_time_update(&mut v));
        assert!(!v.paused);
        v.time = 9.0;
        assert!(ctl.on_time_update(&mut v));
        assert!(v.paused);
        assert_eq!(v.time, 2.0);
    }

    #[test]
    fn test_play_before_start_seeks_forward() {
        let ctl = TrimController::new(TrimWindow::new(2.0, 1.0));
        let mut v = video(10.0);
        ctl.on_play(&mut v);
        assert_eq!(v.time, 2.0);
        v.time = 5.0;
        ctl.on_play(&mut v);
        assert_eq!(v.time, 5.0);
    }

    #[test]
    fn test_missing_trim_plays_whole_clip() {
        let ctl = TrimController::new(TrimWindow::new(
            parse_offset(None),
            parse_offset(Some("n/a")),
        ));
        let mut v = video(10.0);
        v.time = 9.99;
        assert!(!ctl.on_time_update(&mut v));
        v.time = 10.0;
        assert!(ctl.on_time_update(&mut v));
        assert_eq!(v.time, 0.0);
    }

    #[test]
    fn test_unknown_duration_never_rewinds() {
        let ctl = TrimController::new(TrimWindow::new(1.0, 1.0));
        let mut v = FakeVideo {
            time: 100.0,
            ..Default::default()
        };
        assert!(!ctl.on_time_update(&mut v));
        assert!(!v.paused);
    }
}
