/// Visual state of the navigation dots and the progress bar.
///
/// Holds no independent state: every field is recomputed from the slide index
/// by [`Indicators::update_nav_dots`] and [`Indicators::update_progress`].
#[derive(Debug, Clone, PartialEq)]
pub struct Indicators {
    dots: Vec<bool>,
    progress_percent: f64,
}

impl Indicators {
    /// Build one dot per slide with the first one active.
    pub fn new(total: usize) -> Self {
        let mut indicators = Self {
            dots: vec![false; total],
            progress_percent: 0.0,
        };
        indicators.update_nav_dots(0);
        indicators.update_progress(0);
        indicators
    }

    pub fn update_nav_dots(&mut self, current: usize) {
        for (i, dot) in self.dots.iter_mut().enumerate() {
            *dot = i == current;
        }
    }

    pub fn update_progress(&mut self, current: usize) {
        self.progress_percent = progress_percent(current, self.dots.len());
    }

    pub fn dots(&self) -> &[bool] {
        &self.dots
    }

    pub fn active_dot(&self) -> Option<usize> {
        self.dots.iter().position(|&active| active)
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    /// Progress as a 0..=1 fraction, for drawing.
    pub fn progress_fraction(&self) -> f32 {
        (self.progress_percent() / 100.0) as f32
    }
}

pub fn progress_percent(current: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((current + 1) as f64 / total as f64) * 100.0
}
