use nectar_data::{Flower, VisualState};

/// Nectar depletion and reset for a single flower.
pub trait FlowerLogic {
    /// Removes up to `amount` nectar and returns what was actually taken.
    ///
    /// Emptying the flower deactivates both of its regions.
    fn feed(&mut self, amount: f32) -> f32;
    /// Refills the flower and reactivates its regions.
    fn reset(&mut self);
    fn has_nectar(&self) -> bool;
}

impl FlowerLogic for Flower {
    fn feed(&mut self, amount: f32) -> f32 {
        // `max` also maps NaN requests to zero.
        let taken = amount.max(0.0).min(self.nectar);
        self.nectar -= taken;

        if self.nectar <= 0.0 {
            self.nectar = 0.0;
            self.regions_active = false;
            self.visual = VisualState::Empty;
        }
        taken
    }

    fn reset(&mut self) {
        self.nectar = 1.0;
        self.regions_active = true;
        self.visual = VisualState::Full;
    }

    fn has_nectar(&self) -> bool {
        self.nectar > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nectar_data::NodeId;

    fn flower() -> Flower {
        Flower::new(NodeId(1), "Flower")
    }

    #[test]
    fn test_feed_partial() {
        let mut f = flower();
        let taken = f.feed(0.25);
        assert!((taken - 0.25).abs() < 1e-6);
        assert!((f.nectar - 0.75).abs() < 1e-6);
        assert!(f.has_nectar());
        assert_eq!(f.visual, VisualState::Full);
        assert!(f.regions_active);
    }

    #[test]
    fn test_feed_more_than_available_empties() {
        let mut f = flower();
        f.nectar = 0.3;
        let taken = f.feed(5.0);
        assert!((taken - 0.3).abs() < 1e-6);
        assert_eq!(f.nectar, 0.0);
        assert!(!f.has_nectar());
        assert_eq!(f.visual, VisualState::Empty);
        assert!(!f.regions_active);
    }

    #[test]
    fn test_feed_negative_or_nan_takes_nothing() {
        let mut f = flower();
        assert_eq!(f.feed(-1.0), 0.0);
        assert_eq!(f.feed(f32::NAN), 0.0);
        assert_eq!(f.nectar, 1.0);
    }

    #[test]
    fn test_feed_empty_flower_returns_zero() {
        let mut f = flower();
        f.feed(1.0);
        assert_eq!(f.feed(0.01), 0.0);
        assert_eq!(f.nectar, 0.0);
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut f = flower();
        f.feed(2.0);
        f.reset();
        assert_eq!(f.nectar, 1.0);
        assert!(f.regions_active);
        assert_eq!(f.visual, VisualState::Full);
    }
}
