use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, pos2, vec2};

use crate::background::{BackgroundImage, BackgroundTextures};
use crate::element::MIN_SHAPE_POINTS;
use crate::geometry::hit_testing::HANDLE_RADIUS_PX;
use crate::geometry::snap::SnapKind;
use crate::scene::{BadgeStyle, Primitive, Scene, StrokeStyle};
use crate::text::BADGE_TEXT_SCALE;
use crate::viewport::Viewport;
use crate::viewport::mapping::{drawing_rect_on_screen, pixels_per_unit, to_screen_space};

const CROSSHAIR_PX: f32 = 12.0;
const SNAP_GLYPH_PX: f32 = 6.0;
const HANDLE_FILL: Color32 = Color32::WHITE;
const HANDLE_OUTLINE: Color32 = Color32::from_rgb(37, 99, 235);

/// Paints scenes and the background onto the canvas through one shared transform.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    container: Rect,
    viewport: Viewport,
    /// Screen pixels per drawing unit; the smaller axis keeps lines from getting fat on wide canvases
    unit: f32,
}

impl Renderer {
    pub fn new(container: Rect, viewport: &Viewport) -> Self {
        let ppu = pixels_per_unit(container, viewport);
        Self {
            container,
            viewport: *viewport,
            unit: ppu.x.min(ppu.y),
        }
    }

    fn screen(&self, point: Pos2) -> Pos2 {
        to_screen_space(point, self.container, &self.viewport)
    }

    fn stroke(&self, style: &StrokeStyle) -> Stroke {
        Stroke::new((style.width * self.unit).max(1.0), style.color)
    }

    /// The photo fills the whole drawing space; the reference is tinted by its opacity on top.
    pub fn paint_background(&self, painter: &Painter, background: &BackgroundImage, textures: &BackgroundTextures) {
        let rect = drawing_rect_on_screen(self.container, &self.viewport);
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        painter.image(textures.photo().id(), rect, uv, Color32::WHITE);
        if let (Some(reference), Some(texture)) = (background.reference(), textures.reference()) {
            let tint = Color32::WHITE.gamma_multiply(reference.opacity());
            painter.image(texture.id(), rect, uv, tint);
        }
    }

    /// Outline of the drawing space when there is no photo.
    pub fn paint_blank(&self, painter: &Painter) {
        let rect = drawing_rect_on_screen(self.container, &self.viewport);
        painter.rect_filled(rect, 0.0, Color32::from_gray(250));
        painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::from_gray(180)));
    }

    pub fn paint_scene(&self, painter: &Painter, scene: &Scene) {
        for primitive in scene.primitives() {
            match primitive {
                Primitive::Path { points, closed, stroke } => self.paint_path(painter, points, *closed, stroke),
                Primitive::Segments { segments, stroke } => {
                    for [a, b] in segments {
                        self.paint_path(painter, &[*a, *b], false, stroke);
                    }
                }
                Primitive::Badge {
                    center,
                    radius,
                    half_width,
                    text,
                    style,
                } => self.paint_badge(painter, *center, *radius, *half_width, text, style),
                Primitive::Handle { center } => {
                    let center = self.screen(*center);
                    painter.circle(center, HANDLE_RADIUS_PX, HANDLE_FILL, Stroke::new(2.0, HANDLE_OUTLINE));
                }
                Primitive::Cursor { point, kind } => self.paint_cursor(painter, *point, *kind),
            }
        }
    }

    fn paint_path(&self, painter: &Painter, points: &[Pos2], closed: bool, style: &StrokeStyle) {
        let mut screen: Vec<Pos2> = points.iter().map(|p| self.screen(*p)).collect();
        if screen.len() < MIN_SHAPE_POINTS {
            return;
        }
        let stroke = self.stroke(style);
        match style.dash {
            Some((dash, gap)) => {
                if closed {
                    screen.push(screen[0]);
                }
                let dash = (dash * self.unit).max(1.0);
                let gap = (gap * self.unit).max(1.0);
                painter.extend(Shape::dashed_line(&screen, stroke, dash, gap));
            }
            None if closed => {
                painter.add(Shape::closed_line(screen, stroke));
            }
            None => {
                painter.add(Shape::line(screen, stroke));
            }
        }
    }

    fn paint_badge(&self, painter: &Painter, center: Pos2, radius: f32, half_width: f32, text: &str, style: &BadgeStyle) {
        let center = self.screen(center);
        // Badges stay legible when zoomed out; the pill keeps its proportions.
        let factor = (radius * self.unit).max(8.0) / radius.max(f32::EPSILON);
        let radius = radius * factor;
        let font = FontId::proportional(radius * BADGE_TEXT_SCALE);
        let outline = Stroke::new(1.5, style.outline);
        if style.pill {
            let rect = Rect::from_center_size(center, vec2(half_width * factor * 2.0, radius * 2.0));
            painter.rect(rect, radius, style.fill, outline);
        } else {
            painter.circle(center, radius, style.fill, outline);
        }
        painter.text(center, Align2::CENTER_CENTER, text, font, style.text_color);
    }

    fn paint_cursor(&self, painter: &Painter, point: Pos2, kind: SnapKind) {
        let center = self.screen(point);
        let hair = Stroke::new(1.0, Color32::from_black_alpha(160));
        painter.line_segment([center - vec2(CROSSHAIR_PX, 0.0), center + vec2(CROSSHAIR_PX, 0.0)], hair);
        painter.line_segment([center - vec2(0.0, CROSSHAIR_PX), center + vec2(0.0, CROSSHAIR_PX)], hair);
        match kind {
            SnapKind::Vertex => {
                let rect = Rect::from_center_size(center, vec2(SNAP_GLYPH_PX, SNAP_GLYPH_PX) * 2.0);
                painter.rect_stroke(rect, 0.0, Stroke::new(2.0, Color32::from_rgb(22, 163, 74)));
            }
            SnapKind::Edge => {
                let r = SNAP_GLYPH_PX;
                let diamond = vec![
                    center + vec2(0.0, -r),
                    center + vec2(r, 0.0),
                    center + vec2(0.0, r),
                    center + vec2(-r, 0.0),
                ];
                painter.add(Shape::closed_line(diamond, Stroke::new(2.0, Color32::from_rgb(234, 88, 12))));
            }
            SnapKind::None => {
                painter.circle_filled(center, 2.0, Color32::from_black_alpha(200));
            }
        }
    }
}
