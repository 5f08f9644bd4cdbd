use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

use super::Stroke;

/// Closed polygonal path payload.
///
/// `points` are in logical pixels, already transformed to screen space.
/// `center` is the fan pivot used for triangulation; every point must be visible
/// from it (true for star-shaped outlines such as regular polygons and stars).
#[derive(Debug, Clone, PartialEq)]
pub struct PathCmd {
    pub points: Vec<Vec2>,
    pub center: Vec2,
    pub fill: Color,
    pub stroke: Option<Stroke>,
}

impl DrawList {
    /// Records a closed path.
    #[inline]
    pub fn push_path(&mut self, points: Vec<Vec2>, center: Vec2, fill: Color, stroke: Option<Stroke>) {
        self.push(DrawCmd::Path(PathCmd { points, center, fill, stroke }));
    }
}
