//! Plain 2D math on drawing-space points.

use egui::{Pos2, Vec2};

pub mod hit_testing;
pub mod snap;

/// Closest point to `point` on the segment `a`-`b`.
///
/// Projects onto the segment direction and clamps the parameter to [0, 1].
pub fn closest_point_on_segment(point: Pos2, a: Pos2, b: Pos2) -> Pos2 {
    let segment = b - a;
    let len_sq = segment.length_sq();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((point - a).dot(segment) / len_sq).clamp(0.0, 1.0);
    a + segment * t
}

/// Distance from a point to a line segment.
pub fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    point.distance(closest_point_on_segment(point, a, b))
}

/// Arithmetic mean of the points, `None` for an empty slice.
pub fn centroid(points: &[Pos2]) -> Option<Pos2> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Some((sum / points.len() as f32).to_pos2())
}

/// Even-odd ray casting test.
pub fn point_in_polygon(point: Pos2, polygon: &[Pos2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pj.x + (point.y - pj.y) / (pi.y - pj.y) * (pi.x - pj.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// 45° hatch lines clipped to the inside of a polygon, `spacing` apart.
pub fn hatch_segments(polygon: &[Pos2], spacing: f32) -> Vec<[Pos2; 2]> {
    if polygon.len() < 3 || spacing <= 0.0 {
        return Vec::new();
    }

    // Lines run along `dir`; each one is the set of points with n·p = t.
    let dir = Vec2::new(1.0, 1.0).normalized();
    let normal = Vec2::new(1.0, -1.0).normalized();

    let projections: Vec<f32> = polygon.iter().map(|p| p.to_vec2().dot(normal)).collect();
    let min_t = projections.iter().copied().fold(f32::INFINITY, f32::min);
    let max_t = projections.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let mut segments = Vec::new();
    let mut t = (min_t / spacing).floor() * spacing + spacing * 0.5;
    while t < max_t {
        let mut crossings: Vec<Pos2> = Vec::new();
        for i in 0..polygon.len() {
            let j = (i + 1) % polygon.len();
            let (ta, tb) = (projections[i], projections[j]);
            if (ta > t) != (tb > t) {
                let s = (t - ta) / (tb - ta);
                crossings.push(polygon[i] + (polygon[j] - polygon[i]) * s);
            }
        }
        crossings.sort_by(|a, b| a.to_vec2().dot(dir).total_cmp(&b.to_vec2().dot(dir)));
        for pair in crossings.chunks_exact(2) {
            segments.push([pair[0], pair[1]]);
        }
        t += spacing;
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_projection_is_clamped() {
        let a = pos2(0.0, 0.0);
        let b = pos2(10.0, 0.0);
        assert_eq!(closest_point_on_segment(pos2(5.0, 3.0), a, b), pos2(5.0, 0.0));
        assert_eq!(closest_point_on_segment(pos2(-4.0, 1.0), a, b), a);
        assert_eq!(closest_point_on_segment(pos2(14.0, 1.0), a, b), b);
        assert_eq!(distance_to_segment(pos2(5.0, 3.0), a, b), 3.0);
    }

    #[test]
    fn test_degenerate_segment() {
        let a = pos2(2.0, 2.0);
        assert_eq!(closest_point_on_segment(pos2(5.0, 6.0), a, a), a);
        assert_eq!(distance_to_segment(pos2(5.0, 6.0), a, a), 5.0);
    }

    #[test]
    fn test_centroid_is_mean() {
        let pts = [pos2(0.0, 0.0), pos2(4.0, 0.0), pos2(4.0, 2.0)];
        let c = centroid(&pts).unwrap();
        assert!((c.x - 8.0 / 3.0).abs() < 1e-5);
        assert!((c.y - 2.0 / 3.0).abs() < 1e-5);
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0), pos2(0.0, 10.0)];
        assert!(point_in_polygon(pos2(5.0, 5.0), &square));
        assert!(!point_in_polygon(pos2(15.0, 5.0), &square));
        assert!(!point_in_polygon(pos2(5.0, 5.0), &square[..2]));
    }

    #[test]
    fn test_hatch_stays_inside() {
        let square = [pos2(0.0, 0.0), pos2(100.0, 0.0), pos2(100.0, 100.0), pos2(0.0, 100.0)];
        let segments = hatch_segments(&square, 10.0);
        assert!(!segments.is_empty());
        for [a, b] in segments {
            let mid = a + (b - a) * 0.5;
            assert!(point_in_polygon(mid, &square));
        }
    }
}
