//! Badge text, measured and rasterized with the faces egui paints with.
//!
//! The live view lays text out through egui; the exported raster and the hit
//! tests go through [`BadgeFont`], which loads egui's default proportional
//! family in the same fallback order so both agree on glyphs and widths.

use std::sync::OnceLock;

use ab_glyph::{Font as _, FontArc, FontVec, GlyphId, PxScale, ScaleFont as _, point};
use egui::{FontDefinitions, FontFamily, Pos2};

/// Badge font size relative to the badge radius.
pub const BADGE_TEXT_SCALE: f32 = 1.1;

static DEFAULT_FONT: OnceLock<BadgeFont> = OnceLock::new();

/// A family of faces tried in order until one has the glyph.
pub struct BadgeFont {
    faces: Vec<FontArc>,
}

impl std::fmt::Debug for BadgeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeFont").field("faces", &self.faces.len()).finish()
    }
}

impl BadgeFont {
    /// egui's proportional family, loaded once.
    pub fn get() -> &'static BadgeFont {
        DEFAULT_FONT.get_or_init(Self::egui_proportional)
    }

    fn egui_proportional() -> Self {
        let definitions = FontDefinitions::default();
        let names = definitions
            .families
            .get(&FontFamily::Proportional)
            .cloned()
            .unwrap_or_default();
        let faces: Vec<FontArc> = names
            .iter()
            .filter_map(|name| {
                let data = definitions.font_data.get(name)?;
                match FontVec::try_from_vec_and_index(data.font.to_vec(), data.index) {
                    Ok(face) => Some(FontArc::new(face)),
                    Err(err) => {
                        log::warn!("Skipping font {}: {}", name, err);
                        None
                    }
                }
            })
            .collect();
        if faces.is_empty() {
            log::error!("No proportional font available; badge text will not be exported");
        }
        Self { faces }
    }

    fn face_for(&self, c: char) -> Option<(&FontArc, GlyphId)> {
        self.faces
            .iter()
            .find_map(|face| {
                let id = face.glyph_id(c);
                (id.0 != 0).then_some((face, id))
            })
            .or_else(|| self.faces.first().map(|face| (face, face.glyph_id(c))))
    }

    /// Glyphs of `text` at `height` with their pen x offsets, plus the total advance.
    fn layout(&self, text: &str, height: f32) -> (Vec<(&FontArc, GlyphId, f32)>, f32) {
        let mut glyphs = Vec::new();
        let mut x = 0.0;
        let mut prev: Option<(&FontArc, GlyphId)> = None;
        for c in text.chars() {
            let Some((face, id)) = self.face_for(c) else {
                continue;
            };
            let scaled = face.as_scaled(PxScale::from(height));
            if let Some((prev_face, prev_id)) = prev {
                // Kerning only applies within one face.
                if std::ptr::eq(prev_face, face) {
                    x += scaled.kern(prev_id, id);
                }
            }
            glyphs.push((face, id, x));
            x += scaled.h_advance(id);
            prev = Some((face, id));
        }
        (glyphs, x)
    }

    /// Advance width of `text` at `height`, in the same units as `height`.
    pub fn text_width(&self, text: &str, height: f32) -> f32 {
        self.layout(text, height).1
    }

    /// Rasterize `text` centered on `center`, calling `plot(x, y, coverage)` per covered pixel.
    pub fn draw_centered(&self, text: &str, height: f32, center: Pos2, mut plot: impl FnMut(i32, i32, f32)) {
        let Some(primary) = self.faces.first() else {
            return;
        };
        let scale = PxScale::from(height);
        let metrics = primary.as_scaled(scale);
        let baseline = center.y + (metrics.ascent() + metrics.descent()) / 2.0;
        let (glyphs, width) = self.layout(text, height);
        let left = center.x - width / 2.0;

        for (face, id, x) in glyphs {
            let glyph = id.with_scale_and_position(scale, point(left + x, baseline));
            let Some(outlined) = face.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                if coverage > 0.0 {
                    plot(bounds.min.x as i32 + gx as i32, bounds.min.y as i32 + gy as i32, coverage);
                }
            });
        }
    }
}

/// Half the horizontal extent of a badge: a circle of `radius`, or a pill stretched to fit `text`.
pub fn badge_half_width(text: &str, radius: f32, pill: bool) -> f32 {
    if !pill {
        return radius;
    }
    let text_width = BadgeFont::get().text_width(text, radius * BADGE_TEXT_SCALE);
    ((text_width + radius) / 2.0).max(radius)
}
