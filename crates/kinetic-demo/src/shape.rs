use kinetic_engine::coords::Vec2;
use kinetic_engine::paint::Color;

use crate::template::ShapeKind;

/// Stable identity of a live shape; backends key their caches on it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

/// Outline width for every live shape, in logical px.
pub const STROKE_WIDTH: f32 = 1.0;

/// A vertex with its mutable position and the template point it started from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LiveVertex {
    pub pos: Vec2,
    pub origin: Vec2,
}

impl LiveVertex {
    #[inline]
    pub fn from_template(origin: Vec2) -> Self {
        Self { pos: origin, origin }
    }
}

/// One animated shape in the scene.
///
/// Vertices are local to `position`; `rotation` and `scale` apply around it.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveShape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub vertices: Vec<LiveVertex>,
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
    pub fill: Color,
    pub stroke: Color,
}

impl LiveShape {
    pub fn new(id: ShapeId, kind: ShapeKind, template: &[Vec2], position: Vec2, rotation: f32, fill: Color) -> Self {
        Self {
            id,
            kind,
            vertices: template.iter().copied().map(LiveVertex::from_template).collect(),
            position,
            rotation,
            scale: 1.0,
            fill,
            stroke: Color::WHITE,
        }
    }

    /// Outline in screen space: scale, then rotate, then translate.
    pub fn world_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices
            .iter()
            .map(move |v| (v.pos * self.scale).rotated(self.rotation) + self.position)
    }
}
