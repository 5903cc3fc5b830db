//! Conversion between screen pixels and the fixed drawing space.
//!
//! The canvas is a `DRAWING_EXTENT`² logical square stretched over the
//! container, then `translate(offset) scale(scale)`. Both directions below
//! implement that transform and are exact inverses of each other.

use egui::{Pos2, Rect, Vec2};

use super::Viewport;

/// Width and height of drawing space.
pub const DRAWING_EXTENT: f32 = 1000.0;

fn container_size(container: Rect) -> Vec2 {
    Vec2::new(container.width().max(1.0), container.height().max(1.0))
}

/// Screen pixels per drawing unit on each axis, zoom included.
pub fn pixels_per_unit(container: Rect, viewport: &Viewport) -> Vec2 {
    container_size(container) / DRAWING_EXTENT * viewport.scale
}

/// Map a pointer position to drawing space.
pub fn to_drawing_space(pointer: Pos2, container: Rect, viewport: &Viewport) -> Pos2 {
    let scale = viewport.scale.max(f32::EPSILON);
    let local = (pointer - container.min - viewport.offset) / scale;
    let size = container_size(container);
    Pos2::new(
        local.x / size.x * DRAWING_EXTENT,
        local.y / size.y * DRAWING_EXTENT,
    )
}

/// Map a drawing-space point back to the screen.
pub fn to_screen_space(point: Pos2, container: Rect, viewport: &Viewport) -> Pos2 {
    let size = container_size(container);
    let local = Vec2::new(
        point.x / DRAWING_EXTENT * size.x,
        point.y / DRAWING_EXTENT * size.y,
    );
    container.min + viewport.offset + local * viewport.scale
}

/// Screen rectangle covered by the whole drawing space, i.e. where the background is drawn.
pub fn drawing_rect_on_screen(container: Rect, viewport: &Viewport) -> Rect {
    Rect::from_min_max(
        to_screen_space(Pos2::ZERO, container, viewport),
        to_screen_space(Pos2::new(DRAWING_EXTENT, DRAWING_EXTENT), container, viewport),
    )
}
