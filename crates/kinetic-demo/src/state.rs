use std::fmt;
use std::str::FromStr;

use kinetic_engine::coords::Vec2;

use crate::template::{ParseKindError, ShapeKind};

/// Renderer backend families.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RendererKind {
    /// Vector markup rasterized by resvg.
    Svg,
    /// Immediate-mode 2D raster.
    Canvas,
    /// GPU paths.
    Webgl,
}

impl RendererKind {
    pub const ALL: [RendererKind; 3] = [RendererKind::Svg, RendererKind::Canvas, RendererKind::Webgl];

    pub fn name(self) -> &'static str {
        match self {
            RendererKind::Svg => "svg",
            RendererKind::Canvas => "canvas",
            RendererKind::Webgl => "webgl",
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RendererKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RendererKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseKindError::new("renderer", s))
    }
}

/// Per-frame operations applied to every live shape.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operation {
    Position,
    Rotation,
    Scale,
    Vertices,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Position,
        Operation::Rotation,
        Operation::Scale,
        Operation::Vertices,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Position => "position",
            Operation::Rotation => "rotation",
            Operation::Scale => "scale",
            Operation::Vertices => "vertices",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Operation::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseKindError::new("operation", s))
    }
}

/// Which shape kinds new spawns may pick from.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ShapeFilter([bool; 5]);

impl ShapeFilter {
    pub fn only(kinds: &[ShapeKind]) -> Self {
        let mut f = Self::default();
        for &k in kinds {
            f.set(k, true);
        }
        f
    }

    #[inline]
    pub fn set(&mut self, kind: ShapeKind, on: bool) {
        self.0[kind.index()] = on;
    }

    #[inline]
    pub fn is_active(&self, kind: ShapeKind) -> bool {
        self.0[kind.index()]
    }

    /// Active kinds in declaration order.
    pub fn active(&self) -> Vec<ShapeKind> {
        ShapeKind::ALL.into_iter().filter(|k| self.is_active(*k)).collect()
    }
}

/// Enabled per-shape operations.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct OperationSet {
    pub position: bool,
    pub rotation: bool,
    pub scale: bool,
    pub vertices: bool,
}

impl OperationSet {
    pub fn only(ops: &[Operation]) -> Self {
        let mut set = Self::default();
        for &op in ops {
            set.set(op, true);
        }
        set
    }

    pub fn set(&mut self, op: Operation, on: bool) {
        match op {
            Operation::Position => self.position = on,
            Operation::Rotation => self.rotation = on,
            Operation::Scale => self.scale = on,
            Operation::Vertices => self.vertices = on,
        }
    }

    pub fn is_enabled(&self, op: Operation) -> bool {
        match op {
            Operation::Position => self.position,
            Operation::Rotation => self.rotation,
            Operation::Scale => self.scale,
            Operation::Vertices => self.vertices,
        }
    }

    pub fn any(&self) -> bool {
        self.position || self.rotation || self.scale || self.vertices
    }

    pub fn enabled(&self) -> Vec<Operation> {
        Operation::ALL.into_iter().filter(|op| self.is_enabled(*op)).collect()
    }
}

/// Press-and-hold latch, sampled once per frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Latch {
    #[default]
    Idle,
    Held,
}

impl Latch {
    #[inline]
    pub fn press(&mut self) {
        *self = Latch::Held;
    }

    #[inline]
    pub fn release(&mut self) {
        *self = Latch::Idle;
    }

    #[inline]
    pub fn is_held(self) -> bool {
        self == Latch::Held
    }
}

/// Frames per radian of the shared scale oscillation.
pub const SCALE_PERIOD_FRAMES: f32 = 30.0;

/// Everything the updater reads and the controller writes.
#[derive(Debug, Clone)]
pub struct AnimationState {
    /// Renderer the next frame should run on.
    pub renderer: RendererKind,
    pub shapes: ShapeFilter,
    pub operations: OperationSet,
    pub target_count: u32,
    /// Logical px per frame.
    pub velocity: Vec2,
    /// Radians per frame.
    pub spin: f32,
    pub increment: Latch,
    pub decrement: Latch,
    frame: u64,
}

impl AnimationState {
    pub fn new(renderer: RendererKind, shapes: ShapeFilter, operations: OperationSet) -> Self {
        Self {
            renderer,
            shapes,
            operations,
            target_count: 0,
            velocity: Vec2::new(2.0, 0.0),
            spin: std::f32::consts::PI / 30.0,
            increment: Latch::Idle,
            decrement: Latch::Idle,
            frame: 0,
        }
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Shared scale phase for the current frame, reduced to `[0, 2π)`.
    ///
    /// Reduced in f64 so long sessions keep full f32 resolution.
    #[inline]
    pub fn theta(&self) -> f32 {
        let phase = self.frame as f64 / f64::from(SCALE_PERIOD_FRAMES);
        phase.rem_euclid(std::f64::consts::TAU) as f32
    }

    pub(crate) fn advance_frame(&mut self) {
        self.frame += 1;
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(
            RendererKind::Svg,
            ShapeFilter::only(&[ShapeKind::Triangle]),
            OperationSet::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_start() {
        let st = AnimationState::default();
        assert_eq!(st.renderer, RendererKind::Svg);
        assert_eq!(st.shapes.active(), vec![ShapeKind::Triangle]);
        assert!(!st.operations.any());
        assert_eq!(st.target_count, 0);
        assert_eq!(st.velocity, Vec2::new(2.0, 0.0));
        assert!((st.spin - std::f32::consts::PI / 30.0).abs() < 1e-7);
        assert_eq!(st.frame(), 0);
    }

    #[test]
    fn latch_transitions() {
        let mut l = Latch::default();
        assert!(!l.is_held());
        l.press();
        l.press();
        assert!(l.is_held());
        l.release();
        assert_eq!(l, Latch::Idle);
    }

    #[test]
    fn operation_set_toggles() {
        let mut ops = OperationSet::default();
        ops.set(Operation::Scale, true);
        assert!(ops.any());
        assert_eq!(ops.enabled(), vec![Operation::Scale]);
        ops.set(Operation::Scale, false);
        assert!(!ops.any());
    }

    #[test]
    fn filter_lists_active_kinds_in_order() {
        let f = ShapeFilter::only(&[ShapeKind::Star, ShapeKind::Circle]);
        assert_eq!(f.active(), vec![ShapeKind::Circle, ShapeKind::Star]);
    }

    #[test]
    fn theta_tracks_frame() {
        let mut st = AnimationState::default();
        for _ in 0..60 {
            st.advance_frame();
        }
        assert!((st.theta() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn theta_keeps_resolution_after_long_sessions() {
        let mut st = AnimationState::default();
        // About 9 days at 60 fps.
        st.frame = 50_000_000;
        let a = st.theta();
        st.advance_frame();
        let b = st.theta();

        assert!((0.0..std::f32::consts::TAU).contains(&a));
        let step = (b - a).rem_euclid(std::f32::consts::TAU);
        assert!((step - 1.0 / SCALE_PERIOD_FRAMES).abs() < 1e-4, "step {step}");
    }

    #[test]
    fn parse_enums() {
        assert_eq!("WebGL".parse::<RendererKind>(), Ok(RendererKind::Webgl));
        assert_eq!("vertices".parse::<Operation>(), Ok(Operation::Vertices));
        assert!("opengl".parse::<RendererKind>().is_err());
        assert_eq!(
            "spin".parse::<Operation>().unwrap_err().to_string(),
            "unknown operation `spin`"
        );
    }
}
