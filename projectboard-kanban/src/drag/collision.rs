//! Collision strategies: which droppable is the dragged item "over"

use super::entity::BoardEntity;
use super::geometry::{Point, Rect};

/// A registered drop zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Droppable {
    pub entity: BoardEntity,
    pub rect: Rect,
}

impl Droppable {
    pub fn new(entity: impl Into<BoardEntity>, rect: Rect) -> Self {
        Self {
            entity: entity.into(),
            rect,
        }
    }
}

/// Where the dragged item currently is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInput {
    /// The dragged item's rectangle at its current (translated) position
    pub active_rect: Rect,
    /// The pointer position, when known
    pub pointer: Option<Point>,
}

/// Pluggable hit testing. Returns the entity to report as the drop target,
/// or `None` when nothing qualifies.
pub trait CollisionStrategy: Send + Sync {
    fn detect(&self, input: &CollisionInput, droppables: &[Droppable]) -> Option<BoardEntity>;
}

/// Mean distance between corresponding corners of two rectangles
fn corner_distance(a: &Rect, b: &Rect) -> f64 {
    a.corners()
        .iter()
        .zip(b.corners().iter())
        .map(|(p, q)| p.distance_to(*q))
        .sum::<f64>()
        / 4.0
}

/// Picks the droppable whose corners are closest to the dragged item's
/// corners. Works well for stacked lists where droppables overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosestCorners;

impl CollisionStrategy for ClosestCorners {
    fn detect(&self, input: &CollisionInput, droppables: &[Droppable]) -> Option<BoardEntity> {
        droppables
            .iter()
            .map(|d| (d.entity, corner_distance(&input.active_rect, &d.rect)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entity, _)| entity)
    }
}

/// Picks among the droppables containing the pointer, preferring the one
/// whose corners are nearest to it. Reports nothing without a pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerWithin;

impl CollisionStrategy for PointerWithin {
    fn detect(&self, input: &CollisionInput, droppables: &[Droppable]) -> Option<BoardEntity> {
        let pointer = input.pointer?;
        droppables
            .iter()
            .filter(|d| d.rect.contains(pointer))
            .map(|d| {
                let nearest = d
                    .rect
                    .corners()
                    .iter()
                    .map(|c| c.distance_to(pointer))
                    .fold(f64::INFINITY, f64::min);
                (d.entity, nearest)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entity, _)| entity)
    }
}
