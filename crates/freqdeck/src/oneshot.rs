//! One-shot subscriptions to user gestures.
//!
//! A subscription listens to a set of gesture kinds. Each delivery runs the
//! handler; when the handler reports [`Delivery::Completed`] the subscription
//! is dropped for every kind at once. A handler that reports
//! [`Delivery::Retained`] leaves it armed for the next gesture.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Click,
    KeyDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Nothing subscribed to this gesture; the handler did not run.
    Ignored,
    /// Handler ran and wants to keep listening.
    Retained,
    /// Handler ran and the subscription is now gone.
    Completed,
}

#[derive(Debug, Clone, Default)]
pub struct OneShot {
    kinds: Vec<Gesture>,
}

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the subscription for `kinds`. Re-subscribing replaces the previous set.
    pub fn subscribe(&mut self, kinds: &[Gesture]) {
        self.kinds = kinds.to_vec();
    }

    pub fn unsubscribe(&mut self) {
        self.kinds.clear();
    }

    pub fn is_armed(&self) -> bool {
        !self.kinds.is_empty()
    }

    pub fn listens_to(&self, gesture: Gesture) -> bool {
        self.kinds.contains(&gesture)
    }

    /// Deliver `gesture`. `handler` returns `true` once it has done its job.
    pub fn deliver(&mut self, gesture: Gesture, handler: impl FnOnce() -> bool) -> Delivery {
        if !self.listens_to(gesture) {
            return Delivery::Ignored;
        }
        if handler() {
            self.unsubscribe();
            Delivery::Completed
        } else {
            Delivery::Retained
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsubscribed_ignores_gestures() {
        let mut sub = OneShot::new();
        let mut ran = false;
        let delivery = sub.deliver(Gesture::Click, || {
            ran = true;
            true
        });
        assert_eq!(delivery, Delivery::Ignored);
        assert!(!ran);
    }

    #[test]
    fn test_success_removes_all_kinds() {
        let mut sub = OneShot::new();
        sub.subscribe(&[Gesture::Click, Gesture::KeyDown]);
        assert_eq!(sub.deliver(Gesture::KeyDown, || true), Delivery::Completed);
        assert!(!sub.is_armed());
        assert_eq!(sub.deliver(Gesture::Click, || true), Delivery::Ignored);
    }

    #[test]
    fn test_failure_stays_armed() {
        let mut sub = OneShot::new();
        sub.subscribe(&[Gesture::Click, Gesture::KeyDown]);
        assert_eq!(sub.deliver(Gesture::Click, || false), Delivery::Retained);
        assert!(sub.listens_to(Gesture::Click));
        assert!(sub.listens_to(Gesture::KeyDown));
    }

    #[test]
    fn test_only_subscribed_kinds_fire() {
        let mut sub = OneShot::new();
        sub.subscribe(&[Gesture::Click]);
        assert_eq!(sub.deliver(Gesture::KeyDown, || true), Delivery::Ignored);
        assert!(sub.is_armed());
    }
}
