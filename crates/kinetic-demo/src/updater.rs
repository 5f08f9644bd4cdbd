use std::f32::consts::TAU;

use kinetic_engine::coords::{Vec2, Viewport};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::host::RendererHost;
use crate::scene::Scene;
use crate::shape::{LiveShape, ShapeId};
use crate::state::{AnimationState, OperationSet, RendererKind};
use crate::template::{ShapeKind, TemplateRegistry};

/// Upper bound (exclusive) of the per-axis vertex jitter, in logical px.
pub const JITTER: f32 = 5.0;

/// What a single `Updater::step` changed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StepOutcome {
    pub swapped: bool,
    pub spawned: Option<ShapeId>,
    pub removed: Option<ShapeId>,
}

/// State read once at the start of a frame.
#[derive(Debug, Clone)]
struct FrameSnapshot {
    renderer: RendererKind,
    kinds: Vec<ShapeKind>,
    operations: OperationSet,
    velocity: Vec2,
    spin: f32,
    theta: f32,
    increment: bool,
    decrement: bool,
}

impl FrameSnapshot {
    fn take(state: &AnimationState) -> Self {
        Self {
            renderer: state.renderer,
            kinds: state.shapes.active(),
            operations: state.operations,
            velocity: state.velocity,
            spin: state.spin,
            theta: state.theta(),
            increment: state.increment.is_held(),
            decrement: state.decrement.is_held(),
        }
    }
}

/// Advances the animation by one frame.
pub struct Updater {
    rng: SmallRng,
}

impl Updater {
    /// Seeded runs are reproducible; `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => SmallRng::from_os_rng(),
        };
        Self { rng }
    }

    pub fn step(
        &mut self,
        state: &mut AnimationState,
        scene: &mut Scene,
        host: &mut RendererHost,
        registry: &TemplateRegistry,
    ) -> StepOutcome {
        let mut snap = FrameSnapshot::take(state);
        let mut outcome = StepOutcome {
            swapped: host.swap(snap.renderer, scene),
            ..StepOutcome::default()
        };

        if snap.increment {
            state.target_count = state.target_count.saturating_add(1);
        }
        if snap.decrement {
            state.target_count = state.target_count.saturating_sub(1);
        }

        let (width, height) = (host.width(), host.height());
        // Zero-area surface (minimized): nowhere to place or wrap shapes.
        let drawable = Viewport::new(width, height).is_valid();
        if !drawable {
            snap.operations.position = false;
        }

        let target = state.target_count as usize;
        if scene.len() < target && drawable {
            if let Some(shape) = scene.spawn(&mut self.rng, &snap.kinds, registry, width, height) {
                host.add(shape);
                outcome.spawned = Some(shape.id);
            }
        } else if scene.len() > target {
            if let Some(shape) = scene.remove_oldest() {
                host.discard(shape.id);
                outcome.removed = Some(shape.id);
            }
        }

        if snap.operations.any() {
            for (i, shape) in scene.iter_mut().enumerate() {
                let dir = if i % 2 == 0 { -1.0 } else { 1.0 };
                self.apply_operations(&snap, shape, dir, width, height);
            }
        }

        state.advance_frame();
        outcome
    }

    fn apply_operations(&mut self, snap: &FrameSnapshot, shape: &mut LiveShape, dir: f32, width: f32, height: f32) {
        let ops = snap.operations;

        if ops.position {
            if dir > 0.0 {
                shape.position += snap.velocity;
            } else {
                shape.position -= snap.velocity;
            }
            shape.position.x = wrap(shape.position.x, width);
            shape.position.y = wrap(shape.position.y, height);
        }

        if ops.rotation {
            shape.rotation = (shape.rotation + snap.spin * dir).rem_euclid(TAU);
        }

        if ops.scale {
            shape.scale = 0.25 * (snap.theta * dir).sin() + 1.0;
        }

        if ops.vertices {
            for v in &mut shape.vertices {
                v.pos = v.origin
                    + Vec2::new(self.rng.random_range(0.0..JITTER), self.rng.random_range(0.0..JITTER));
            }
        }
    }
}

/// Floor-modulo into `[0, len)`. Degenerate lengths and non-finite values map to 0.
pub fn wrap(v: f32, len: f32) -> f32 {
    if !v.is_finite() || !len.is_finite() || len <= 0.0 {
        return 0.0;
    }
    let r = v.rem_euclid(len);
    // rem_euclid can round up to `len` for tiny negative inputs.
    if r >= len { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::backend::recording::{Call, Recorder};
    use crate::controller::{Controller, UiEvent};
    use crate::state::{Operation, ShapeFilter};

    struct Rig {
        state: AnimationState,
        scene: Scene,
        host: RendererHost,
        registry: TemplateRegistry,
        updater: Updater,
        rec: Recorder,
    }

    impl Rig {
        fn new() -> Self {
            let rec = Recorder::default();
            let host = RendererHost::new(
                Box::new(rec.clone()),
                RendererKind::Svg,
                Viewport::new(400.0, 300.0),
                1.0,
            );
            Self {
                state: AnimationState::default(),
                scene: Scene::new(),
                host,
                registry: TemplateRegistry::new(),
                updater: Updater::new(Some(11)),
                rec,
            }
        }

        fn step(&mut self) -> StepOutcome {
            self.updater.step(&mut self.state, &mut self.scene, &mut self.host, &self.registry)
        }

        fn fill(&mut self, n: u32) {
            self.state.target_count = n;
            for _ in 0..n {
                self.step();
            }
            assert_eq!(self.scene.len(), n as usize);
        }
    }

    fn same_angle(a: f32, b: f32) -> bool {
        let d = (a - b).rem_euclid(TAU);
        d < 1e-5 || TAU - d < 1e-5
    }

    // ── wrap ────────────────────────────────────────────────────────────────

    #[test]
    fn wrap_is_floor_modulo() {
        assert_eq!(wrap(5.0, 10.0), 5.0);
        assert_eq!(wrap(12.0, 10.0), 2.0);
        assert_eq!(wrap(-2.0, 10.0), 8.0);
        assert_eq!(wrap(10.0, 10.0), 0.0);
        assert_eq!(wrap(-1e-9, 10.0), 0.0);
    }

    #[test]
    fn wrap_handles_far_and_degenerate_values() {
        for v in [-1e7_f32, -12345.5, 987654.25, 1e9] {
            let w = wrap(v, 640.0);
            assert!((0.0..640.0).contains(&w), "{v} -> {w}");
        }
        assert_eq!(wrap(3.0, 0.0), 0.0);
        assert_eq!(wrap(f32::NAN, 10.0), 0.0);
    }

    // ── reconciliation ──────────────────────────────────────────────────────

    #[test]
    fn converges_one_step_per_frame() {
        let mut rig = Rig::new();
        rig.state.shapes = ShapeFilter::only(&ShapeKind::ALL);
        rig.state.target_count = 7;

        let mut prev = rig.scene.len();
        for _ in 0..7 {
            rig.step();
            assert_eq!(rig.scene.len(), prev + 1);
            prev = rig.scene.len();
        }

        rig.state.target_count = 2;
        for _ in 0..5 {
            rig.step();
            assert_eq!(rig.scene.len() + 1, prev);
            prev = rig.scene.len();
        }

        // Converged: further frames change nothing.
        let out = rig.step();
        assert_eq!(out.spawned, None);
        assert_eq!(out.removed, None);
        assert_eq!(rig.scene.len(), 2);
    }

    #[test]
    fn empty_filter_never_spawns() {
        let mut rig = Rig::new();
        rig.state.shapes = ShapeFilter::default();
        rig.state.target_count = 3;
        for _ in 0..5 {
            assert_eq!(rig.step().spawned, None);
        }
        assert!(rig.scene.is_empty());
    }

    #[test]
    fn shrink_removes_from_the_front() {
        let mut rig = Rig::new();
        rig.fill(5);
        let original = rig.scene.ids();
        rig.rec.clear();

        rig.state.target_count = 2;
        for _ in 0..3 {
            rig.step();
        }
        assert_eq!(rig.scene.ids(), original[3..].to_vec());

        let released: Vec<ShapeId> = rig
            .rec
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Release(_, id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(released, original[..3].to_vec());
    }

    #[test]
    fn spawned_shapes_are_added_to_the_backend() {
        let mut rig = Rig::new();
        rig.rec.clear();
        rig.state.target_count = 1;
        let out = rig.step();
        let id = out.spawned.unwrap();
        assert_eq!(rig.rec.calls(), vec![Call::Add(RendererKind::Svg, id)]);
    }

    // ── latches ─────────────────────────────────────────────────────────────

    #[test]
    fn holding_increment_for_k_frames_raises_target_by_k() {
        let mut rig = Rig::new();
        let ctl = Controller::new();

        ctl.apply(&mut rig.state, UiEvent::IncrementPressed);
        for _ in 0..4 {
            rig.step();
        }
        ctl.apply(&mut rig.state, UiEvent::PointerReleased);
        assert_eq!(rig.state.target_count, 4);

        for _ in 0..3 {
            rig.step();
        }
        assert_eq!(rig.state.target_count, 4);
    }

    #[test]
    fn decrement_floors_at_zero() {
        let mut rig = Rig::new();
        rig.state.target_count = 1;
        rig.state.decrement.press();
        for _ in 0..3 {
            rig.step();
        }
        assert_eq!(rig.state.target_count, 0);
    }

    #[test]
    fn hold_increment_three_frames_spawns_three_triangles() {
        let mut rig = Rig::new();
        let ctl = Controller::new();

        ctl.apply(&mut rig.state, UiEvent::IncrementPressed);
        let spawned: Vec<ShapeId> = (0..3).filter_map(|_| rig.step().spawned).collect();
        ctl.apply(&mut rig.state, UiEvent::PointerReleased);

        assert_eq!(rig.scene.len(), 3);
        assert_eq!(rig.scene.ids(), spawned);
        assert!(rig.scene.iter().all(|s| s.kind == ShapeKind::Triangle));
    }

    // ── operations ──────────────────────────────────────────────────────────

    #[test]
    fn no_operations_leaves_shapes_untouched() {
        let mut rig = Rig::new();
        rig.fill(4);
        let before: Vec<LiveShape> = rig.scene.iter().cloned().collect();
        for _ in 0..10 {
            rig.step();
        }
        let after: Vec<LiveShape> = rig.scene.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn position_moves_by_direction_and_stays_wrapped() {
        let mut rig = Rig::new();
        rig.fill(2);
        rig.state.operations = OperationSet::only(&[Operation::Position]);

        let before: Vec<Vec2> = rig.scene.iter().map(|s| s.position).collect();
        rig.step();
        let after: Vec<Vec2> = rig.scene.iter().map(|s| s.position).collect();

        assert!((wrap(before[0].x - 2.0, 400.0) - after[0].x).abs() < 1e-4);
        assert!((wrap(before[1].x + 2.0, 400.0) - after[1].x).abs() < 1e-4);

        for _ in 0..500 {
            rig.step();
            for s in rig.scene.iter() {
                assert!((0.0..400.0).contains(&s.position.x));
                assert!((0.0..300.0).contains(&s.position.y));
            }
        }
    }

    #[test]
    fn far_out_of_range_position_is_wrapped() {
        let mut rig = Rig::new();
        rig.fill(1);
        rig.state.operations = OperationSet::only(&[Operation::Position]);
        if let Some(s) = rig.scene.iter_mut().next() {
            s.position = Vec2::new(-98765.0, 54321.0);
        }
        rig.step();
        let p = rig.scene.iter().next().unwrap().position;
        assert!((0.0..400.0).contains(&p.x));
        assert!((0.0..300.0).contains(&p.y));
    }

    #[test]
    fn rotation_spins_in_opposite_directions() {
        let mut rig = Rig::new();
        rig.fill(2);
        rig.state.operations = OperationSet::only(&[Operation::Rotation]);
        let before: Vec<f32> = rig.scene.iter().map(|s| s.rotation).collect();
        rig.step();
        let after: Vec<f32> = rig.scene.iter().map(|s| s.rotation).collect();
        let spin = rig.state.spin;
        assert!(same_angle(after[0], before[0] - spin));
        assert!(same_angle(after[1], before[1] + spin));
        assert!(after.iter().all(|r| (0.0..TAU).contains(r)));
    }

    #[test]
    fn rotation_stays_reduced_over_many_frames() {
        let mut rig = Rig::new();
        rig.fill(2);
        rig.state.operations = OperationSet::only(&[Operation::Rotation]);
        rig.state.spin = 1.0;
        for _ in 0..10_000 {
            rig.step();
        }
        assert!(rig.scene.iter().all(|s| (0.0..TAU).contains(&s.rotation)));
    }

    #[test]
    fn scale_follows_shared_phase() {
        let mut rig = Rig::new();
        rig.fill(2);
        rig.state.operations = OperationSet::only(&[Operation::Scale]);
        let theta = rig.state.theta();
        rig.step();
        let scales: Vec<f32> = rig.scene.iter().map(|s| s.scale).collect();
        assert!((scales[0] - (0.25 * (-theta).sin() + 1.0)).abs() < 1e-6);
        assert!((scales[1] - (0.25 * theta.sin() + 1.0)).abs() < 1e-6);
        assert!(scales.iter().all(|s| (0.75..=1.25).contains(s)));
    }

    #[test]
    fn vertex_jitter_stays_near_origin() {
        let mut rig = Rig::new();
        rig.state.shapes = ShapeFilter::only(&ShapeKind::ALL);
        rig.fill(5);
        rig.state.operations = OperationSet::only(&[Operation::Vertices]);
        for _ in 0..20 {
            rig.step();
            for v in rig.scene.iter().flat_map(|s| s.vertices.iter()) {
                let d = v.pos - v.origin;
                let range = -1e-4..JITTER + 1e-4;
                assert!(range.contains(&d.x) && range.contains(&d.y));
            }
        }
    }

    // ── renderer swap ───────────────────────────────────────────────────────

    #[test]
    fn renderer_request_swaps_once() {
        let mut rig = Rig::new();
        rig.fill(2);
        rig.state.renderer = RendererKind::Canvas;
        assert!(rig.step().swapped);
        assert!(!rig.step().swapped);
        assert_eq!(rig.host.kind(), RendererKind::Canvas);
        assert_eq!(rig.scene.len(), 2);
    }

    // ── zero-area surface ───────────────────────────────────────────────────

    #[test]
    fn minimized_surface_keeps_positions_and_defers_spawns() {
        let mut rig = Rig::new();
        rig.fill(3);
        rig.state.operations = OperationSet::only(&[Operation::Position]);
        let before: Vec<Vec2> = rig.scene.iter().map(|s| s.position).collect();

        rig.host.resize(Viewport::new(0.0, 0.0), 1.0);
        rig.state.target_count = 5;
        let out = rig.step();
        assert_eq!(out.spawned, None);
        assert_eq!(rig.scene.len(), 3);
        assert_eq!(rig.state.frame(), 4);

        rig.host.resize(Viewport::new(400.0, 300.0), 1.0);
        let after: Vec<Vec2> = rig.scene.iter().map(|s| s.position).collect();
        assert_eq!(after, before);
        assert!(after.iter().all(|p| *p != Vec2::zero()));

        assert!(rig.step().spawned.is_some());
        assert_eq!(rig.scene.len(), 4);
    }

    #[test]
    fn minimized_surface_still_removes_and_rotates() {
        let mut rig = Rig::new();
        rig.fill(3);
        rig.state.operations = OperationSet::only(&[Operation::Rotation]);
        let before: Vec<f32> = rig.scene.iter().map(|s| s.rotation).collect();

        rig.host.resize(Viewport::new(0.0, 0.0), 1.0);
        rig.state.target_count = 2;
        assert!(rig.step().removed.is_some());
        let after: Vec<f32> = rig.scene.iter().map(|s| s.rotation).collect();
        assert!(same_angle(after[0], before[1] - rig.state.spin));
    }

    #[test]
    fn frame_counter_advances_every_step() {
        let mut rig = Rig::new();
        for _ in 0..3 {
            rig.step();
        }
        assert_eq!(rig.state.frame(), 3);
    }
}
