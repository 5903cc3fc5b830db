use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod common;

pub use common::{BADGE_RADIUS, MIN_SHAPE_POINTS};

use crate::geometry;
use crate::text;

/// Stable identifier of a drawn element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kinds of annotation the morphological study knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Outer boundary of the urban block
    Block,
    /// One cadastral parcel inside the block
    Lot,
    /// Built footprint inside a lot
    Building,
    /// Street axis, an open polyline
    Street,
    /// Free text anchored at a single point
    Label,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Block,
        ElementKind::Lot,
        ElementKind::Building,
        ElementKind::Street,
        ElementKind::Label,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Block => "block",
            ElementKind::Lot => "lot",
            ElementKind::Building => "building",
            ElementKind::Street => "street",
            ElementKind::Label => "label",
        }
    }

    /// Caption used in the toolbar
    pub fn title(&self) -> &'static str {
        match self {
            ElementKind::Block => "Manzana",
            ElementKind::Lot => "Lote",
            ElementKind::Building => "Edificación",
            ElementKind::Street => "Eje de vía",
            ElementKind::Label => "Etiqueta",
        }
    }

    /// Closed kinds connect their last point back to the first.
    pub fn is_closed(&self) -> bool {
        match self {
            ElementKind::Block | ElementKind::Lot | ElementKind::Building => true,
            ElementKind::Street | ElementKind::Label => false,
        }
    }

    /// Kinds that receive a sequential number at creation.
    pub fn is_numbered(&self) -> bool {
        match self {
            ElementKind::Lot | ElementKind::Building => true,
            ElementKind::Block | ElementKind::Street | ElementKind::Label => false,
        }
    }

    /// Kinds drawn with a draggable badge.
    pub fn has_badge(&self) -> bool {
        self.is_numbered() || matches!(self, ElementKind::Label)
    }
}

/// A drawn annotation in drawing space.
///
/// Points are never empty: shapes are built from at least [`MIN_SHAPE_POINTS`]
/// points and labels from exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    points: Vec<Pos2>,
    number: Option<u32>,
    label_offset: Vec2,
    text: Option<String>,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn label_offset(&self) -> Vec2 {
        self.label_offset
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Text shown inside the badge, if this kind has one.
    pub fn badge_text(&self) -> Option<String> {
        match self.kind {
            ElementKind::Lot | ElementKind::Building => self.number.map(|n| n.to_string()),
            ElementKind::Label => self.text.clone(),
            ElementKind::Block | ElementKind::Street => None,
        }
    }

    /// Arithmetic mean of all points.
    pub fn centroid(&self) -> Pos2 {
        geometry::centroid(&self.points).unwrap_or_default()
    }

    /// Where the number/label badge is drawn.
    pub fn badge_center(&self) -> Pos2 {
        self.centroid() + self.label_offset
    }

    /// Half the width of the badge as drawn; labels stretch to fit their text.
    pub fn badge_half_width(&self) -> f32 {
        let text = self.badge_text().unwrap_or_default();
        text::badge_half_width(&text, BADGE_RADIUS, self.kind == ElementKind::Label)
    }

    /// Consecutive point pairs; closed kinds include the wrap-around edge.
    pub fn edges(&self) -> Vec<(Pos2, Pos2)> {
        let mut edges: Vec<(Pos2, Pos2)> = self.points.windows(2).map(|w| (w[0], w[1])).collect();
        if self.kind.is_closed() && self.points.len() >= 2 {
            if let (Some(&last), Some(&first)) = (self.points.last(), self.points.first()) {
                edges.push((last, first));
            }
        }
        edges
    }

    /// Replace all points with `original` shifted by `delta`.
    ///
    /// Used by drags, which always start from an immutable snapshot.
    pub(crate) fn translate_from(&mut self, original: &[Pos2], delta: Vec2) {
        if original.len() != self.points.len() {
            return;
        }
        for (point, origin) in self.points.iter_mut().zip(original) {
            *point = *origin + delta;
        }
    }

    /// Move one vertex. Returns false when the index is out of range.
    pub(crate) fn set_vertex(&mut self, index: usize, pos: Pos2) -> bool {
        match self.points.get_mut(index) {
            Some(point) => {
                *point = pos;
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_label_offset(&mut self, offset: Vec2) {
        self.label_offset = offset;
    }

    pub(crate) fn set_number(&mut self, number: u32) {
        if self.kind.is_numbered() {
            self.number = Some(number);
        }
    }

    pub(crate) fn set_text(&mut self, text: String) {
        if self.kind == ElementKind::Label {
            self.text = Some(text);
        }
    }
}

/// Factory functions for creating elements
pub mod factory {
    use super::*;

    /// Create a polygon or polyline element.
    ///
    /// Returns `None` for labels or when fewer than [`MIN_SHAPE_POINTS`] points are given.
    pub fn create_shape(kind: ElementKind, points: Vec<Pos2>, number: Option<u32>) -> Option<Element> {
        if kind == ElementKind::Label || points.len() < MIN_SHAPE_POINTS {
            return None;
        }
        Some(Element {
            id: ElementId::new(),
            kind,
            points,
            number: if kind.is_numbered() { number } else { None },
            label_offset: Vec2::ZERO,
            text: None,
        })
    }

    /// Create a one-point text label.
    pub fn create_label(at: Pos2, text: impl Into<String>) -> Element {
        Element {
            id: ElementId::new(),
            kind: ElementKind::Label,
            points: vec![at],
            number: None,
            label_offset: Vec2::ZERO,
            text: Some(text.into()),
        }
    }
}
