//! Snapping of a raw cursor position onto existing geometry.
//!
//! Vertices win over edges. Within each pass the first candidate inside the
//! threshold is taken, in element order then point order; there is no global
//! nearest search, so two candidates both inside the radius resolve by
//! iteration order.

use egui::Pos2;
use serde::{Deserialize, Serialize};

use super::closest_point_on_segment;
use crate::element::Element;

/// Default vertex snap radius in screen pixels.
pub const VERTEX_SNAP_PX: f32 = 15.0;
/// Default edge snap radius in screen pixels.
pub const EDGE_SNAP_PX: f32 = 10.0;

/// What the cursor was corrected onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapKind {
    Vertex,
    Edge,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    pub point: Pos2,
    pub kind: SnapKind,
}

impl SnapResult {
    pub fn raw(point: Pos2) -> Self {
        Self { point, kind: SnapKind::None }
    }
}

/// Snap thresholds in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapRadii {
    pub vertex_px: f32,
    pub edge_px: f32,
}

impl Default for SnapRadii {
    fn default() -> Self {
        Self {
            vertex_px: VERTEX_SNAP_PX,
            edge_px: EDGE_SNAP_PX,
        }
    }
}

/// Find the snap target for `point`.
///
/// The pixel radii are divided by `scale`, so the snap feels the same at every zoom level.
pub fn find_snap(
    point: Pos2,
    elements: &[Element],
    current_points: &[Pos2],
    scale: f32,
    radii: SnapRadii,
) -> SnapResult {
    let scale = scale.max(f32::EPSILON);
    let vertex_radius = radii.vertex_px / scale;
    let edge_radius = radii.edge_px / scale;

    // Label anchors count as vertices; a one-point label has no edges.
    let committed = elements.iter().flat_map(|e| e.points().iter());
    if let Some(vertex) = committed
        .chain(current_points.iter())
        .find(|v| v.distance(point) <= vertex_radius)
    {
        log::debug!("snap: vertex {:?}", vertex);
        return SnapResult { point: *vertex, kind: SnapKind::Vertex };
    }

    for element in elements {
        for (a, b) in element.edges() {
            let candidate = closest_point_on_segment(point, a, b);
            if candidate.distance(point) <= edge_radius {
                log::debug!("snap: edge of {} at {:?}", element.id(), candidate);
                return SnapResult { point: candidate, kind: SnapKind::Edge };
            }
        }
    }

    SnapResult::raw(point)
}
