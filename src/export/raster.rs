use std::io::Cursor;

use egui::{Color32, Pos2};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect, Stroke, StrokeDash, Transform};

use super::{BackgroundSnapshot, ExportRequest, ExportedImage};
use crate::error::ExportError;
use crate::scene::{BadgeStyle, Primitive, StrokeStyle};
use crate::text::{BADGE_TEXT_SCALE, BadgeFont};
use crate::viewport::DRAWING_EXTENT;

/// Badge outline thickness, in drawing units.
const BADGE_OUTLINE: f32 = 1.5;

/// Flattens a scene over the background into one square PNG.
///
/// The overlay is drawn in drawing space with only a `size / 1000` scale, so the
/// user's pan and zoom never leak into the export.
pub struct RasterExporter;

impl RasterExporter {
    pub fn render(request: &ExportRequest) -> Result<ExportedImage, ExportError> {
        let size = request.size;
        if size == 0 {
            return Err(ExportError::InvalidSize(size));
        }

        let mut canvas = match &request.background {
            Some(background) => Self::compose_background(background, size),
            None => {
                let [r, g, b] = request.fill;
                RgbaImage::from_pixel(size, size, Rgba([r, g, b, 255]))
            }
        };

        let overlay = Self::rasterize(request)?;
        imageops::overlay(&mut canvas, &overlay, 0, 0);

        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(canvas).write_to(&mut png, ImageFormat::Png)?;
        let png = png.into_inner();
        log::info!("Exported {}x{} study ({} bytes)", size, size, png.len());

        Ok(ExportedImage {
            generation: request.generation,
            size,
            png,
        })
    }

    fn compose_background(background: &BackgroundSnapshot, size: u32) -> RgbaImage {
        let mut canvas = imageops::resize(background.photo.as_ref(), size, size, FilterType::Triangle);
        if let Some((reference, opacity)) = &background.reference {
            let mut reference = imageops::resize(reference.as_ref(), size, size, FilterType::Triangle);
            for pixel in reference.pixels_mut() {
                pixel.0[3] = (pixel.0[3] as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
            }
            imageops::overlay(&mut canvas, &reference, 0, 0);
        }
        canvas
    }

    /// Draw the vector overlay into a transparent raster of the export size.
    fn rasterize(request: &ExportRequest) -> Result<RgbaImage, ExportError> {
        let size = request.size;
        let mut pixmap = Pixmap::new(size, size).ok_or(ExportError::OverlayAllocation(size))?;
        let k = size as f32 / DRAWING_EXTENT;
        let transform = Transform::from_scale(k, k);

        for primitive in request.scene.primitives() {
            match primitive {
                Primitive::Path { points, closed, stroke } => {
                    stroke_polyline(&mut pixmap, points, *closed, stroke, transform);
                }
                Primitive::Segments { segments, stroke } => {
                    for [a, b] in segments {
                        stroke_polyline(&mut pixmap, &[*a, *b], false, stroke, transform);
                    }
                }
                Primitive::Badge {
                    center,
                    radius,
                    half_width,
                    text,
                    style,
                } => draw_badge(&mut pixmap, *center, *radius, *half_width, text, style, k),
                Primitive::Handle { .. } | Primitive::Cursor { .. } => {}
            }
        }

        Ok(pixmap_to_rgba(&pixmap))
    }
}

fn paint(color: Color32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r(), color.g(), color.b(), color.a());
    paint.anti_alias = true;
    paint
}

fn stroke_polyline(pixmap: &mut Pixmap, points: &[Pos2], closed: bool, style: &StrokeStyle, transform: Transform) {
    let mut pb = PathBuilder::new();
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return;
    };
    pb.move_to(first.x, first.y);
    for p in iter {
        pb.line_to(p.x, p.y);
    }
    if closed {
        pb.close();
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let mut stroke = Stroke {
        width: style.width,
        line_join: tiny_skia::LineJoin::Round,
        line_cap: tiny_skia::LineCap::Round,
        ..Stroke::default()
    };
    if let Some((dash, gap)) = style.dash {
        stroke.dash = StrokeDash::new(vec![dash, gap], 0.0);
        stroke.line_cap = tiny_skia::LineCap::Butt;
    }
    pixmap.stroke_path(&path, &paint(style.color), &stroke, transform, None);
}

/// Circle, or a pill wide enough for the text, in drawing units.
fn badge_path(center: Pos2, radius: f32, half_width: f32) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    let inner = (half_width - radius).max(0.0);
    pb.push_circle(center.x - inner, center.y, radius);
    pb.push_circle(center.x + inner, center.y, radius);
    if inner > 0.0 {
        pb.push_rect(Rect::from_ltrb(center.x - inner, center.y - radius, center.x + inner, center.y + radius)?);
    }
    pb.finish()
}

fn draw_badge(pixmap: &mut Pixmap, center: Pos2, radius: f32, half_width: f32, text: &str, style: &BadgeStyle, k: f32) {
    let transform = Transform::from_scale(k, k);
    // Outline first, then the fill inset by the outline width.
    if let Some(outer) = badge_path(center, radius + BADGE_OUTLINE, half_width + BADGE_OUTLINE) {
        pixmap.fill_path(&outer, &paint(style.outline), FillRule::Winding, transform, None);
    }
    if let Some(inner) = badge_path(center, radius, half_width) {
        pixmap.fill_path(&inner, &paint(style.fill), FillRule::Winding, transform, None);
    }

    // Glyphs are rasterized straight in output pixels.
    let height = radius * BADGE_TEXT_SCALE * k;
    let center = Pos2::new(center.x * k, center.y * k);
    let (width, rows) = (pixmap.width() as i32, pixmap.height() as i32);
    let pixels = pixmap.pixels_mut();
    BadgeFont::get().draw_centered(text, height, center, |x, y, coverage| {
        if (0..width).contains(&x) && (0..rows).contains(&y) {
            let px = &mut pixels[(y * width + x) as usize];
            *px = blend_over(*px, style.text_color, coverage);
        }
    });
}

/// Source-over of `color` at `coverage` onto a premultiplied pixel.
fn blend_over(dst: PremultipliedColorU8, color: Color32, coverage: f32) -> PremultipliedColorU8 {
    let a = (coverage.clamp(0.0, 1.0) * color.a() as f32 / 255.0).clamp(0.0, 1.0);
    let mix = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8;
    let alpha = mix(255, dst.alpha());
    let channel = |src: u8, dst: u8| mix(src, dst).min(alpha);
    PremultipliedColorU8::from_rgba(
        channel(color.r(), dst.red()),
        channel(color.g(), dst.green()),
        channel(color.b(), dst.blue()),
        alpha,
    )
    .unwrap_or(dst)
}

fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (out, px) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = px.demultiply();
        *out = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Scene, SceneOptions};
    use crate::state::{DrawingSession, Mode};
    use crate::element::ElementKind;
    use egui::pos2;
    use std::sync::Arc;

    fn lot_scene() -> Scene {
        let mut session = DrawingSession::new();
        session.set_mode(Mode::Draw(ElementKind::Lot));
        session.current_points.extend([
            pos2(100.0, 100.0),
            pos2(300.0, 100.0),
            pos2(300.0, 300.0),
            pos2(100.0, 300.0),
        ]);
        session.commit_shape(ElementKind::Lot);
        Scene::build(&session, SceneOptions::export(12.0))
    }

    fn request(size: u32, background: Option<BackgroundSnapshot>) -> ExportRequest {
        ExportRequest {
            generation: 3,
            scene: lot_scene(),
            size,
            background,
            fill: [255, 255, 255],
        }
    }

    fn decode(image: &ExportedImage) -> RgbaImage {
        image::load_from_memory(&image.png).unwrap().to_rgba8()
    }

    #[test]
    fn test_export_is_square_png() {
        let exported = RasterExporter::render(&request(200, None)).unwrap();
        assert_eq!(exported.generation, 3);
        let image = decode(&exported);
        assert_eq!(image.dimensions(), (200, 200));
        // Far from every line: plain fill
        assert_eq!(image.get_pixel(180, 180), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_lot_outline_is_yellow_at_drawing_coordinates() {
        let image = decode(&RasterExporter::render(&request(1000, None)).unwrap());
        let edge = image.get_pixel(200, 100);
        assert!(edge[0] > 200 && edge[1] > 150 && edge[2] < 100, "{:?}", edge);
    }

    #[test]
    fn test_background_is_stretched_under_overlay() {
        let photo = RgbaImage::from_pixel(10, 20, Rgba([0, 0, 255, 255]));
        let background = BackgroundSnapshot {
            photo: Arc::new(photo),
            reference: None,
        };
        let image = decode(&RasterExporter::render(&request(100, Some(background))).unwrap());
        assert_eq!(image.get_pixel(95, 95), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_reference_blends_by_opacity() {
        let background = BackgroundSnapshot {
            photo: Arc::new(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]))),
            reference: Some((Arc::new(RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]))), 0.5)),
        };
        let image = decode(&RasterExporter::render(&request(100, Some(background))).unwrap());
        let px = image.get_pixel(95, 95);
        assert!((120..=135).contains(&px[0]), "{:?}", px);
    }

    fn label_export(text: &str) -> RgbaImage {
        let mut session = DrawingSession::new();
        session.push_element(crate::element::factory::create_label(pos2(500.0, 500.0), text));
        let request = ExportRequest {
            generation: 1,
            scene: Scene::build(&session, SceneOptions::export(12.0)),
            size: 1000,
            background: None,
            fill: [40, 40, 40],
        };
        decode(&RasterExporter::render(&request).unwrap())
    }

    #[test]
    fn test_label_text_keeps_accents() {
        let plain = label_export("LEON");
        let accented = label_export("LEÓN");
        assert_ne!(plain, accented);
        // Dark text pixels inside the white pill.
        let dark = (485..515)
            .flat_map(|x| (495..505).map(move |y| (x, y)))
            .filter(|&(x, y)| accented.get_pixel(x, y)[0] < 100)
            .count();
        assert!(dark > 10, "only {} text pixels", dark);
    }

    #[test]
    fn test_lowercase_export_differs_from_uppercase() {
        assert_ne!(label_export("plaza"), label_export("PLAZA"));
    }

    #[test]
    fn test_blend_over_full_coverage_replaces_color() {
        let white = PremultipliedColorU8::from_rgba(255, 255, 255, 255).unwrap();
        let out = blend_over(white, Color32::BLACK, 1.0);
        assert_eq!((out.red(), out.alpha()), (0, 255));
        assert_eq!(blend_over(white, Color32::BLACK, 0.0), white);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(RasterExporter::render(&request(0, None)), Err(ExportError::InvalidSize(0))));
    }
}
