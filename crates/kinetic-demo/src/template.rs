//! Canonical vertex geometry for each shape kind.

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use kinetic_engine::coords::Vec2;

/// Reference radius every template is built at.
pub const RADIUS: f32 = 25.0;

/// Points used to approximate a circle.
pub const CIRCLE_SEGMENTS: usize = 32;

const STAR_POINTS: usize = 6;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Triangle,
    Circle,
    Square,
    Pentagon,
    Star,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Triangle,
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Pentagon,
        ShapeKind::Star,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Triangle => "triangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Star => "star",
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ShapeKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseKindError::new("shape", s))
    }
}

/// Unrecognized name for one of the demo's closed enums.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseKindError {
    what: &'static str,
    input: String,
}

impl ParseKindError {
    pub(crate) fn new(what: &'static str, input: &str) -> Self {
        Self { what, input: input.to_string() }
    }
}

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.what, self.input)
    }
}

impl std::error::Error for ParseKindError {}

/// Immutable template geometry, built once.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: [Vec<Vec2>; 5],
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            templates: ShapeKind::ALL.map(build),
        }
    }

    /// Canonical vertices for `kind`, centered on the origin.
    #[inline]
    pub fn vertices(&self, kind: ShapeKind) -> &[Vec2] {
        &self.templates[kind.index()]
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn build(kind: ShapeKind) -> Vec<Vec2> {
    match kind {
        ShapeKind::Triangle => regular_polygon(3),
        ShapeKind::Pentagon => regular_polygon(5),
        ShapeKind::Circle => circle(CIRCLE_SEGMENTS),
        ShapeKind::Square => vec![
            Vec2::new(-RADIUS, -RADIUS),
            Vec2::new(RADIUS, -RADIUS),
            Vec2::new(RADIUS, RADIUS),
            Vec2::new(-RADIUS, RADIUS),
        ],
        ShapeKind::Star => star(STAR_POINTS),
    }
}

/// Point-down base: vertex `i` sits at `2π(i + ½)/n + π/2`.
fn regular_polygon(sides: usize) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let a = TAU * (i as f32 + 0.5) / sides as f32 + PI / 2.0;
            Vec2::new(RADIUS * a.cos(), RADIUS * a.sin())
        })
        .collect()
}

fn circle(segments: usize) -> Vec<Vec2> {
    (0..segments)
        .map(|i| {
            let a = TAU * i as f32 / segments as f32;
            Vec2::new(RADIUS * a.cos(), RADIUS * a.sin())
        })
        .collect()
}

fn star(points: usize) -> Vec<Vec2> {
    let n = points * 2;
    (0..n)
        .map(|i| {
            let r = if i % 2 == 0 { RADIUS } else { RADIUS / 2.0 };
            let a = TAU * i as f32 / n as f32;
            Vec2::new(r * a.cos(), r * a.sin())
        })
        .collect()
}
