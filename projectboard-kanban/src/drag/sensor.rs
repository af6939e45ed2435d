//! Pointer activation constraint

use super::geometry::Point;

/// Pixels the pointer must travel before a press becomes a drag
pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 10.0;

/// Decides when a pointer press turns into a drag, so plain clicks on a
/// card or column header never start one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSensor {
    distance: f64,
}

impl PointerSensor {
    pub fn new() -> Self {
        Self {
            distance: DEFAULT_ACTIVATION_DISTANCE,
        }
    }

    /// Require a different travel distance
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance.max(0.0);
        self
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Whether moving from `origin` to `current` activates the drag
    pub fn activates(&self, origin: Point, current: Point) -> bool {
        origin.distance_to(current) >= self.distance
    }
}

impl Default for PointerSensor {
    fn default() -> Self {
        Self::new()
    }
}
