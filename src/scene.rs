//! Turns a drawing session into a flat list of drawing-space primitives.
//!
//! The live egui renderer and the raster exporter both paint from a [`Scene`],
//! so the exported picture has exactly the geometry the user saw.

use egui::{Color32, Pos2};

use crate::element::{BADGE_RADIUS, Element, ElementKind};
use crate::geometry::hatch_segments;
use crate::geometry::snap::SnapKind;
use crate::state::{DrawingSession, Mode};

/// Line style. Widths and dash lengths are in drawing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color32,
    pub width: f32,
    /// `(dash, gap)`
    pub dash: Option<(f32, f32)>,
}

impl StrokeStyle {
    pub const fn solid(color: Color32, width: f32) -> Self {
        Self { color, width, dash: None }
    }

    pub const fn dashed(color: Color32, width: f32, dash: f32, gap: f32) -> Self {
        Self {
            color,
            width,
            dash: Some((dash, gap)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeStyle {
    pub fill: Color32,
    pub outline: Color32,
    pub text_color: Color32,
    /// Stretch horizontally to fit the text instead of staying a circle
    pub pill: bool,
}

/// How one kind of element is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub stroke: Option<StrokeStyle>,
    pub hatch: Option<StrokeStyle>,
    pub badge: Option<BadgeStyle>,
}

pub const BLOCK_RED: Color32 = Color32::from_rgb(220, 38, 38);
pub const LOT_YELLOW: Color32 = Color32::from_rgb(250, 204, 21);
pub const BUILDING_BLUE: Color32 = Color32::from_rgb(37, 99, 235);
pub const STREET_GRAY: Color32 = Color32::from_rgb(71, 85, 105);
pub const PREVIEW_CYAN: Color32 = Color32::from_rgb(6, 182, 212);

impl ElementStyle {
    pub fn for_kind(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Block => Self {
                stroke: Some(StrokeStyle::solid(BLOCK_RED, 6.0)),
                hatch: None,
                badge: None,
            },
            ElementKind::Lot => Self {
                stroke: Some(StrokeStyle::solid(LOT_YELLOW, 4.5)),
                hatch: None,
                badge: Some(BadgeStyle {
                    fill: LOT_YELLOW,
                    outline: Color32::BLACK,
                    text_color: Color32::BLACK,
                    pill: false,
                }),
            },
            ElementKind::Building => Self {
                stroke: Some(StrokeStyle::solid(BUILDING_BLUE, 2.5)),
                hatch: Some(StrokeStyle::solid(BUILDING_BLUE.gamma_multiply(0.6), 1.0)),
                badge: Some(BadgeStyle {
                    fill: BUILDING_BLUE,
                    outline: Color32::WHITE,
                    text_color: Color32::WHITE,
                    pill: false,
                }),
            },
            ElementKind::Street => Self {
                stroke: Some(StrokeStyle::dashed(STREET_GRAY, 3.0, 14.0, 8.0)),
                hatch: None,
                badge: None,
            },
            ElementKind::Label => Self {
                stroke: None,
                hatch: None,
                badge: Some(BadgeStyle {
                    fill: Color32::WHITE,
                    outline: Color32::BLACK,
                    text_color: Color32::BLACK,
                    pill: true,
                }),
            },
        }
    }
}

/// One drawable item, in drawing space unless stated otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Path {
        points: Vec<Pos2>,
        closed: bool,
        stroke: StrokeStyle,
    },
    Segments {
        segments: Vec<[Pos2; 2]>,
        stroke: StrokeStyle,
    },
    Badge {
        center: Pos2,
        radius: f32,
        /// Equal to `radius` for circles, wider for pills
        half_width: f32,
        text: String,
        style: BadgeStyle,
    },
    /// Vertex handle of the selected element; constant size on screen
    Handle { center: Pos2 },
    /// Crosshair and snap glyph; constant size on screen
    Cursor { point: Pos2, kind: SnapKind },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Include the in-progress shape, handles and cursor
    pub interactive: bool,
    pub hatch_spacing: f32,
}

impl SceneOptions {
    pub fn interactive(hatch_spacing: f32) -> Self {
        Self {
            interactive: true,
            hatch_spacing,
        }
    }

    /// Committed elements only.
    pub fn export(hatch_spacing: f32) -> Self {
        Self {
            interactive: false,
            hatch_spacing,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    primitives: Vec<Primitive>,
}

impl Scene {
    pub fn build(session: &DrawingSession, options: SceneOptions) -> Self {
        let mut scene = Self::default();

        for element in session.elements() {
            scene.push_element(element, options.hatch_spacing);
        }
        // Badges go on top of every outline.
        for element in session.elements() {
            scene.push_badge(element);
        }

        if options.interactive {
            scene.push_preview(session);
            if session.mode() == Mode::Edit {
                if let Some(selected) = session.selected().and_then(|id| session.element(id)) {
                    scene
                        .primitives
                        .extend(selected.points().iter().map(|p| Primitive::Handle { center: *p }));
                }
            }
            if session.mode().shows_cursor() && !session.is_panning() {
                if let Some(cursor) = session.cursor() {
                    scene.primitives.push(Primitive::Cursor {
                        point: cursor.point,
                        kind: cursor.kind,
                    });
                }
            }
        }

        scene
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    fn push_element(&mut self, element: &Element, hatch_spacing: f32) {
        let style = ElementStyle::for_kind(element.kind());
        if let Some(hatch) = style.hatch {
            let segments = hatch_segments(element.points(), hatch_spacing);
            if !segments.is_empty() {
                self.primitives.push(Primitive::Segments { segments, stroke: hatch });
            }
        }
        if let Some(stroke) = style.stroke {
            self.primitives.push(Primitive::Path {
                points: element.points().to_vec(),
                closed: element.kind().is_closed(),
                stroke,
            });
        }
    }

    fn push_badge(&mut self, element: &Element) {
        let style = ElementStyle::for_kind(element.kind());
        if let (Some(badge), Some(text)) = (style.badge, element.badge_text()) {
            self.primitives.push(Primitive::Badge {
                center: element.badge_center(),
                radius: BADGE_RADIUS,
                half_width: element.badge_half_width(),
                text,
                style: badge,
            });
        }
    }

    fn push_preview(&mut self, session: &DrawingSession) {
        let Some(kind) = session.mode().drawing_kind() else {
            return;
        };
        let points = session.current_points();
        let Some(last) = points.last() else {
            return;
        };
        let color = ElementStyle::for_kind(kind)
            .stroke
            .map_or(PREVIEW_CYAN, |s| s.color);
        if points.len() > 1 {
            self.primitives.push(Primitive::Path {
                points: points.to_vec(),
                closed: false,
                stroke: StrokeStyle::solid(color, 2.0),
            });
        }
        if let Some(cursor) = session.cursor() {
            self.primitives.push(Primitive::Segments {
                segments: vec![[*last, cursor.point]],
                stroke: StrokeStyle::dashed(PREVIEW_CYAN, 1.5, 6.0, 4.0),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::snap::SnapResult;
    use crate::state::DrawingSession;
    use egui::{pos2, vec2};

    const SQUARE: [Pos2; 4] = [
        pos2(100.0, 100.0),
        pos2(300.0, 100.0),
        pos2(300.0, 300.0),
        pos2(100.0, 300.0),
    ];

    fn session_with(kind: ElementKind) -> DrawingSession {
        let mut session = DrawingSession::new();
        session.set_mode(Mode::Draw(kind));
        session.current_points.extend_from_slice(&SQUARE);
        session.commit_shape(kind);
        session
    }

    #[test]
    fn test_kinds_have_distinct_strokes() {
        let strokes: Vec<_> = [ElementKind::Block, ElementKind::Lot, ElementKind::Building, ElementKind::Street]
            .into_iter()
            .filter_map(|k| ElementStyle::for_kind(k).stroke)
            .collect();
        for (i, a) in strokes.iter().enumerate() {
            for b in &strokes[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(ElementStyle::for_kind(ElementKind::Street).stroke.unwrap().dash.is_some());
    }

    #[test]
    fn test_building_is_hatched_and_numbered() {
        let scene = Scene::build(&session_with(ElementKind::Building), SceneOptions::export(12.0));
        assert!(matches!(scene.primitives()[0], Primitive::Segments { .. }));
        assert!(matches!(scene.primitives()[1], Primitive::Path { closed: true, .. }));
        match &scene.primitives()[2] {
            Primitive::Badge { center, text, .. } => {
                assert_eq!(*center, pos2(200.0, 200.0));
                assert_eq!(text, "1");
            }
            other => panic!("expected a badge, got {:?}", other),
        }
    }

    #[test]
    fn test_badge_follows_offset() {
        let mut session = session_with(ElementKind::Lot);
        session.elements[0].set_label_offset(vec2(15.0, -5.0));
        let scene = Scene::build(&session, SceneOptions::export(12.0));
        assert!(scene.primitives().iter().any(|p| matches!(
            p,
            Primitive::Badge { center, .. } if *center == pos2(215.0, 195.0)
        )));
    }

    #[test]
    fn test_export_scene_skips_interactive_parts() {
        let mut session = session_with(ElementKind::Lot);
        session.current_points.push(pos2(500.0, 500.0));
        session.current_points.push(pos2(600.0, 500.0));
        session.cursor = Some(SnapResult::raw(pos2(650.0, 550.0)));

        let export = Scene::build(&session, SceneOptions::export(12.0));
        let live = Scene::build(&session, SceneOptions::interactive(12.0));
        assert_eq!(export.primitives().len(), 2);
        assert!(live.primitives().len() > export.primitives().len());
        assert!(live.primitives().iter().any(|p| matches!(p, Primitive::Cursor { .. })));
    }

    #[test]
    fn test_handles_only_for_selected_in_edit_mode() {
        let mut session = session_with(ElementKind::Lot);
        let id = session.elements()[0].id();
        session.set_mode(Mode::Edit);
        session.selected = Some(id);
        let scene = Scene::build(&session, SceneOptions::interactive(12.0));
        let handles = scene
            .primitives()
            .iter()
            .filter(|p| matches!(p, Primitive::Handle { .. }))
            .count();
        assert_eq!(handles, 4);
    }

    #[test]
    fn test_no_cursor_in_view_mode() {
        let mut session = session_with(ElementKind::Street);
        session.set_mode(Mode::View);
        session.cursor = Some(SnapResult::raw(pos2(1.0, 1.0)));
        let scene = Scene::build(&session, SceneOptions::interactive(12.0));
        assert!(!scene.primitives().iter().any(|p| matches!(p, Primitive::Cursor { .. })));
    }
}
