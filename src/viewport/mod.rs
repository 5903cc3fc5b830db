//! Pan and zoom of the drawing canvas.
//!
//! The viewport is a pure presentation transform, `translate(offset) scale(scale)`,
//! applied to the background photo and the vector overlay together. It never
//! changes drawing-space coordinates.

use egui::Vec2;
use serde::{Deserialize, Serialize};

pub mod mapping;

pub use mapping::{DRAWING_EXTENT, to_drawing_space, to_screen_space};

/// Zoom bounds and step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Multiplicative factor per wheel notch
    pub step: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 10.0,
            step: 1.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f32,
    /// Pan offset in container pixels
    pub offset: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Apply one wheel notch at `cursor` (container-local pixels).
    ///
    /// Positive `wheel_delta` zooms in. Returns false when the scale was already at its bound.
    pub fn zoom_at(&mut self, cursor: Vec2, wheel_delta: f32, limits: ZoomLimits) -> bool {
        if wheel_delta == 0.0 {
            return false;
        }
        let factor = if wheel_delta > 0.0 { limits.step } else { 1.0 / limits.step };
        let new_scale = (self.scale * factor).clamp(limits.min_scale, limits.max_scale);
        self.zoom_to(cursor, new_scale)
    }

    /// Set the scale, keeping the point under `cursor` fixed on screen.
    pub fn zoom_to(&mut self, cursor: Vec2, new_scale: f32) -> bool {
        if new_scale == self.scale || new_scale <= 0.0 {
            return false;
        }
        self.offset = cursor - (cursor - self.offset) * (new_scale / self.scale);
        self.scale = new_scale;
        true
    }
}

/// Anchor recorded when a pan drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanState {
    anchor: Vec2,
}

impl PanState {
    pub fn begin(cursor: Vec2, viewport: &Viewport) -> Self {
        Self {
            anchor: cursor - viewport.offset,
        }
    }

    pub fn update(&self, cursor: Vec2, viewport: &mut Viewport) {
        viewport.offset = cursor - self.anchor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    #[test]
    fn test_zoom_keeps_cursor_fixed() {
        let mut viewport = Viewport { scale: 1.5, offset: vec2(-40.0, 25.0) };
        let cursor = vec2(320.0, 180.0);
        let before = (cursor - viewport.offset) / viewport.scale;
        assert!(viewport.zoom_at(cursor, 1.0, ZoomLimits::default()));
        let after = (cursor - viewport.offset) / viewport.scale;
        assert!((before - after).length() < 1e-3);
        assert!((viewport.scale - 1.65).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let limits = ZoomLimits::default();
        let mut viewport = Viewport { scale: limits.max_scale, offset: Vec2::ZERO };
        assert!(!viewport.zoom_at(vec2(10.0, 10.0), 3.0, limits));
        assert_eq!(viewport.scale, limits.max_scale);

        let mut viewport = Viewport::default();
        for _ in 0..100 {
            viewport.zoom_at(vec2(10.0, 10.0), -1.0, limits);
        }
        assert_eq!(viewport.scale, limits.min_scale);
    }

    #[test]
    fn test_pan_follows_anchor() {
        let mut viewport = Viewport { scale: 2.0, offset: vec2(10.0, 10.0) };
        let pan = PanState::begin(vec2(100.0, 100.0), &viewport);
        pan.update(vec2(130.0, 80.0), &mut viewport);
        assert_eq!(viewport.offset, vec2(40.0, -10.0));
        assert_eq!(viewport.scale, 2.0);
    }

    #[test]
    fn test_reset() {
        let mut viewport = Viewport { scale: 3.0, offset: vec2(5.0, 5.0) };
        viewport.reset();
        assert!(viewport.is_identity());
    }
}
