use std::collections::VecDeque;
use std::f32::consts::TAU;

use kinetic_engine::coords::Vec2;
use kinetic_engine::paint::Color;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::shape::{LiveShape, ShapeId};
use crate::template::{ShapeKind, TemplateRegistry};

/// Live shapes in insertion order. Removal always takes the oldest.
#[derive(Debug, Default)]
pub struct Scene {
    shapes: VecDeque<LiveShape>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LiveShape> {
        self.shapes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LiveShape> {
        self.shapes.iter_mut()
    }

    pub fn ids(&self) -> Vec<ShapeId> {
        self.shapes.iter().map(|s| s.id).collect()
    }

    /// Spawns one shape of a kind drawn uniformly from `kinds`, at a random
    /// position inside `width × height`.
    ///
    /// Returns `None` (and adds nothing) when `kinds` is empty.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        kinds: &[ShapeKind],
        registry: &TemplateRegistry,
        width: f32,
        height: f32,
    ) -> Option<&LiveShape> {
        let kind = *kinds.choose(rng)?;

        let position = Vec2::new(unit(rng) * width.max(0.0), unit(rng) * height.max(0.0));
        let rotation = unit(rng) * TAU;
        let fill = Color::from_rgb8(rng.random(), rng.random(), rng.random());

        let id = self.allocate_id();
        let shape = LiveShape::new(id, kind, registry.vertices(kind), position, rotation, fill);
        log::debug!("spawn {kind} {id:?} at ({:.1}, {:.1})", position.x, position.y);

        Some(self.push(shape))
    }

    /// Appends an already-built shape.
    pub fn push(&mut self, shape: LiveShape) -> &LiveShape {
        self.next_id = self.next_id.max(shape.id.0 + 1);
        self.shapes.push_back(shape);
        let last = self.shapes.len() - 1;
        &self.shapes[last]
    }

    /// Removes and returns the oldest shape.
    pub fn remove_oldest(&mut self) -> Option<LiveShape> {
        let shape = self.shapes.pop_front()?;
        log::debug!("remove {} {:?}", shape.kind, shape.id);
        Some(shape)
    }

    fn allocate_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Uniform sample in `[0, 1)`.
#[inline]
fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(0.0..1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn spawn_n(scene: &mut Scene, n: usize, kinds: &[ShapeKind]) {
        let reg = TemplateRegistry::new();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..n {
            scene.spawn(&mut rng, kinds, &reg, 640.0, 480.0);
        }
    }

    // ── spawn ───────────────────────────────────────────────────────────────

    #[test]
    fn spawn_with_empty_filter_is_noop() {
        let mut scene = Scene::new();
        spawn_n(&mut scene, 3, &[]);
        assert!(scene.is_empty());
    }

    #[test]
    fn spawn_stays_inside_bounds() {
        let mut scene = Scene::new();
        spawn_n(&mut scene, 200, &ShapeKind::ALL);
        for s in scene.iter() {
            assert!((0.0..640.0).contains(&s.position.x));
            assert!((0.0..480.0).contains(&s.position.y));
            assert!((0.0..TAU).contains(&s.rotation));
            assert_eq!(s.fill.a, 1.0);
            assert_eq!(s.stroke, Color::WHITE);
        }
    }

    #[test]
    fn spawn_only_uses_active_kinds() {
        let mut scene = Scene::new();
        spawn_n(&mut scene, 50, &[ShapeKind::Star, ShapeKind::Square]);
        assert!(scene.iter().all(|s| matches!(s.kind, ShapeKind::Star | ShapeKind::Square)));
    }

    #[test]
    fn spawn_copies_template_vertices() {
        let reg = TemplateRegistry::new();
        let mut scene = Scene::new();
        spawn_n(&mut scene, 1, &[ShapeKind::Pentagon]);
        let s = scene.iter().next().unwrap();
        let origins: Vec<Vec2> = s.vertices.iter().map(|v| v.origin).collect();
        assert_eq!(origins, reg.vertices(ShapeKind::Pentagon));
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut scene = Scene::new();
        spawn_n(&mut scene, 5, &ShapeKind::ALL);
        let ids = scene.ids();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    // ── removal ─────────────────────────────────────────────────────────────

    #[test]
    fn fifo_removal_drops_the_front() {
        let mut scene = Scene::new();
        spawn_n(&mut scene, 6, &ShapeKind::ALL);
        let before = scene.ids();

        for _ in 0..4 {
            scene.remove_oldest();
        }
        assert_eq!(scene.ids(), before[4..].to_vec());
    }

    #[test]
    fn remove_on_empty_is_noop() {
        let mut scene = Scene::new();
        assert!(scene.remove_oldest().is_none());
        assert_eq!(scene.len(), 0);
    }

    #[test]
    fn ids_not_reused_after_removal() {
        let mut scene = Scene::new();
        spawn_n(&mut scene, 2, &ShapeKind::ALL);
        scene.remove_oldest();
        scene.remove_oldest();
        spawn_n(&mut scene, 1, &ShapeKind::ALL);
        assert_eq!(scene.ids(), vec![ShapeId(2)]);
    }
}
