/// Compositing module
///
/// This module handles:
/// - Centered-square crop arithmetic (geometry.rs)
/// - Drawing the whole stack onto the square canvas (compositor.rs)

pub mod compositor;
pub mod geometry;

pub use compositor::{composite_async, Composite};
