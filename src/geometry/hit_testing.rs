use egui::Pos2;

use super::{distance_to_segment, point_in_polygon};
use crate::element::{BADGE_RADIUS, Element, ElementKind};

/// Screen-pixel radius of a vertex handle.
pub const HANDLE_RADIUS_PX: f32 = 7.0;

/// True when `pos` lies on the element's body.
///
/// Closed shapes hit on their interior or near an edge, streets near a segment,
/// labels on their badge. `tolerance` is in drawing units.
pub fn hit_element_body(element: &Element, pos: Pos2, tolerance: f32) -> bool {
    match element.kind() {
        ElementKind::Block | ElementKind::Lot | ElementKind::Building => {
            point_in_polygon(pos, element.points()) || near_edges(element, pos, tolerance)
        }
        ElementKind::Street => near_edges(element, pos, tolerance),
        ElementKind::Label => hit_badge(element, pos, tolerance),
    }
}

fn near_edges(element: &Element, pos: Pos2, tolerance: f32) -> bool {
    element
        .edges()
        .iter()
        .any(|(a, b)| distance_to_segment(pos, *a, *b) <= tolerance)
}

/// Index of the first vertex within `radius` of `pos`.
pub fn hit_vertex(element: &Element, pos: Pos2, radius: f32) -> Option<usize> {
    element.points().iter().position(|p| p.distance(pos) <= radius)
}

/// True when `pos` is on the element's badge. Elements without a badge never hit.
///
/// A badge is a circle, or a pill whose straight part spans the text; both are
/// the set of points within the radius of a horizontal segment.
pub fn hit_badge(element: &Element, pos: Pos2, tolerance: f32) -> bool {
    if !element.kind().has_badge() {
        return false;
    }
    let center = element.badge_center();
    let inner = (element.badge_half_width() - BADGE_RADIUS).max(0.0);
    let a = Pos2::new(center.x - inner, center.y);
    let b = Pos2::new(center.x + inner, center.y);
    distance_to_segment(pos, a, b) <= BADGE_RADIUS.max(tolerance)
}

/// The top-most element whose body contains `pos`. Later elements draw on top.
pub fn topmost_element(elements: &[Element], pos: Pos2, tolerance: f32) -> Option<&Element> {
    elements.iter().rev().find(|e| hit_element_body(e, pos, tolerance))
}

/// The top-most element whose badge contains `pos`.
pub fn topmost_badge(elements: &[Element], pos: Pos2, tolerance: f32) -> Option<&Element> {
    elements.iter().rev().find(|e| hit_badge(e, pos, tolerance))
}
