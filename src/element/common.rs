// Common constants for all element kinds

/// Fewest points that make a committed polygon or polyline.
pub const MIN_SHAPE_POINTS: usize = 2;

/// Radius of the number/label badge, in drawing units.
pub const BADGE_RADIUS: f32 = 14.0;
