/// Owner of the current slide position.
///
/// The index is always within `[0, total - 1]`. Requests outside that range are
/// rejected without touching the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideIndex {
    current: usize,
    total: usize,
}

/// A successful move between two slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChange {
    pub from: usize,
    pub to: usize,
}

impl SlideIndex {
    /// # Panics
    ///
    /// Panics if `total` is zero. `Deck::from_yaml` rejects decks without slides.
    pub fn new(total: usize) -> Self {
        assert!(total > 0, "a deck needs at least one slide");
        Self { current: 0, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn last(&self) -> usize {
        self.total - 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current == self.last()
    }

    /// Move to `index`, returning the change, or `None` when out of range.
    pub fn set(&mut self, index: usize) -> Option<SlideChange> {
        if !self.contains(index) {
            return None;
        }
        let from = self.current;
        self.current = index;
        Some(SlideChange { from, to: index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_first_slide() {
        let idx = SlideIndex::new(9);
        assert_eq!(idx.current(), 0);
        assert_eq!(idx.total(), 9);
        assert!(idx.is_first());
        assert!(!idx.is_last());
    }

    #[test]
    fn test_set_within_bounds() {
        let mut idx = SlideIndex::new(9);
        assert_eq!(idx.set(8), Some(SlideChange { from: 0, to: 8 }));
        assert_eq!(idx.current(), 8);
        assert!(idx.is_last());
    }

    #[test]
    fn test_set_out_of_range_is_ignored() {
        let mut idx = SlideIndex::new(3);
        idx.set(1);
        assert_eq!(idx.set(3), None);
        assert_eq!(idx.set(usize::MAX), None);
        assert_eq!(idx.current(), 1);
    }

    #[test]
    #[should_panic(expected = "at least one slide")]
    fn test_empty_deck_panics() {
        SlideIndex::new(0);
    }

    #[test]
    fn test_single_slide_deck() {
        let idx = SlideIndex::new(1);
        assert!(idx.is_first());
        assert!(idx.is_last());
    }
}
