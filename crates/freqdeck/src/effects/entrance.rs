use std::collections::HashMap;
use std::time::{Duration, Instant};

use eframe::egui;

pub const VISIBILITY_THRESHOLD: f32 = 0.1;
pub const ENTRANCE_DURATION: Duration = Duration::from_millis(800);

/// Identifies one content element: (slide index, element index within slide).
pub type ElementId = (usize, usize);

/// Fraction of `element` that lies inside `viewport`.
pub fn visible_ratio(element: egui::Rect, viewport: egui::Rect) -> f32 {
    let area = element.area();
    if area <= 0.0 {
        return if viewport.contains(element.center()) {
            1.0
        } else {
            0.0
        };
    }
    let overlap = element.intersect(viewport);
    if !overlap.is_positive() {
        return 0.0;
    }
    overlap.area() / area
}

/// Marks content elements "animated in" the first time enough of them is on
/// screen. The mark is never removed, so each element animates once.
#[derive(Debug, Clone)]
pub struct EntranceObserver {
    threshold: f32,
    animated: HashMap<ElementId, Instant>,
}

impl EntranceObserver {
    pub fn new() -> Self {
        Self {
            threshold: VISIBILITY_THRESHOLD,
            animated: HashMap::new(),
        }
    }

    /// Report where `id` is drawn this frame. Returns whether it is animated in.
    pub fn observe(
        &mut self,
        id: ElementId,
        element: egui::Rect,
        viewport: egui::Rect,
        now: Instant,
    ) -> bool {
        if self.animated.contains_key(&id) {
            return true;
        }
        if visible_ratio(element, viewport) >= self.threshold {
            self.animated.insert(id, now);
            return true;
        }
        false
    }

    /// 0 before the element animated in, rising to 1 over the entrance duration.
    pub fn progress(&self, id: ElementId, now: Instant) -> f32 {
        let Some(&since) = self.animated.get(&id) else {
            return 0.0;
        };
        let elapsed = now.saturating_duration_since(since).as_secs_f32();
        super::ease_in_out(elapsed / ENTRANCE_DURATION.as_secs_f32())
    }

    /// True while any element is still mid-animation.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.animated
            .values()
            .any(|&since| now.saturating_duration_since(since) < ENTRANCE_DURATION)
    }
}

impl Default for EntranceObserver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1000.0, 1000.0))
    }

    #[test]
    fn test_visible_ratio() {
        let inside = egui::Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(100.0, 100.0));
        assert_eq!(visible_ratio(inside, viewport()), 1.0);
        let half = egui::Rect::from_min_size(egui::pos2(950.0, 0.0), egui::vec2(100.0, 100.0));
        assert_eq!(visible_ratio(half, viewport()), 0.5);
        let outside =
            egui::Rect::from_min_size(egui::pos2(2000.0, 0.0), egui::vec2(100.0, 100.0));
        assert_eq!(visible_ratio(outside, viewport()), 0.0);
    }

    #[test]
    fn test_below_threshold_stays_pending() {
        let mut obs = EntranceObserver::new();
        let now = Instant::now();
        // 5% visible
        let el = egui::Rect::from_min_size(egui::pos2(995.0, 0.0), egui::vec2(100.0, 100.0));
        assert!(!obs.observe((0, 0), el, viewport(), now));
        assert_eq!(obs.progress((0, 0), now), 0.0);
    }

    #[test]
    fn test_animated_in_once_and_stays() {
        let mut obs = EntranceObserver::new();
        let now = Instant::now();
        let el = egui::Rect::from_min_size(egui::pos2(900.0, 0.0), egui::vec2(100.0, 100.0));
        assert!(obs.observe((1, 2), el, viewport(), now));
        let gone = el.translate(egui::vec2(5000.0, 0.0));
        assert!(obs.observe((1, 2), gone, viewport(), now + Duration::from_secs(1)));
        assert!(obs.animated.contains_key(&(1, 2)));
        assert!(!obs.animated.contains_key(&(1, 3)));
    }

    #[test]
    fn test_progress_completes_after_duration() {
        let mut obs = EntranceObserver::new();
        let now = Instant::now();
        let el = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(10.0, 10.0));
        obs.observe((0, 0), el, viewport(), now);
        assert!(obs.is_animating(now));
        assert_eq!(obs.progress((0, 0), now + ENTRANCE_DURATION), 1.0);
        assert!(!obs.is_animating(now + ENTRANCE_DURATION));
    }
}
