//! Drag gesture capabilities
//!
//! Pointer tracking and hit testing are kept apart from the reconciliation
//! logic: a front end reports which entity was picked up and which entity it
//! was dropped on, and the engine takes it from there. The collision
//! strategies here are available to front ends that only have geometry.

mod collision;
mod entity;
mod geometry;
mod sensor;

pub use collision::{ClosestCorners, CollisionInput, CollisionStrategy, Droppable, PointerWithin};
pub use entity::{BoardEntity, DragSource, DropTarget, EntityKind};
pub use geometry::{Point, Rect};
pub use sensor::{PointerSensor, DEFAULT_ACTIVATION_DISTANCE};
