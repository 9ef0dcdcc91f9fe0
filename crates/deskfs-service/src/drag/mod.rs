//! Pointer gestures: drag-to-move and rectangular selection.

pub mod geometry;
pub mod machine;

pub use geometry::{Point, Rect};
pub use machine::{DragEffect, DragEvent, DragMachine, DragState, HitTester, PointerKind};
