use kinetic_engine::coords::Viewport;
use kinetic_engine::scene::DrawList;

use crate::backend::{Backend, BackendFactory};
use crate::scene::Scene;
use crate::shape::{LiveShape, ShapeId};
use crate::state::RendererKind;

/// Owns the active backend and the surface it is attached to.
pub struct RendererHost {
    backend: Box<dyn Backend>,
    factory: Box<dyn BackendFactory>,
    viewport: Viewport,
    scale_factor: f32,
}

impl RendererHost {
    /// Creates and attaches a backend of `kind`.
    pub fn new(
        factory: Box<dyn BackendFactory>,
        kind: RendererKind,
        viewport: Viewport,
        scale_factor: f32,
    ) -> Self {
        let mut backend = factory.create(kind);
        backend.attach(viewport, scale_factor);
        log::info!("renderer {kind} attached ({}x{})", viewport.width, viewport.height);
        Self { backend, factory, viewport, scale_factor }
    }

    #[inline]
    pub fn kind(&self) -> RendererKind {
        self.backend.kind()
    }

    /// Replaces the backend when `kind` differs from the active one.
    ///
    /// The old backend releases every shape and detaches before the new one
    /// attaches; live shapes are then added to the new backend in scene order.
    /// Returns `true` if a swap happened.
    pub fn swap(&mut self, kind: RendererKind, scene: &Scene) -> bool {
        let from = self.kind();
        if from == kind {
            return false;
        }

        for shape in scene.iter() {
            self.backend.release(shape.id);
        }
        self.backend.detach();

        let mut next = self.factory.create(kind);
        next.attach(self.viewport, self.scale_factor);
        for shape in scene.iter() {
            next.add(shape);
        }
        self.backend = next;

        log::info!("renderer {from} -> {kind} ({} shapes migrated)", scene.len());
        true
    }

    /// Re-attaches the active backend when the surface size or scale changed.
    pub fn resize(&mut self, viewport: Viewport, scale_factor: f32) {
        if viewport == self.viewport && scale_factor == self.scale_factor {
            return;
        }
        self.viewport = viewport;
        self.scale_factor = scale_factor;
        self.backend.attach(viewport, scale_factor);
        log::debug!("surface resized to {}x{} @{scale_factor}", viewport.width, viewport.height);
    }

    pub fn add(&mut self, shape: &LiveShape) {
        self.backend.add(shape);
    }

    /// Takes a shape out of the backend and frees its resources.
    pub fn discard(&mut self, id: ShapeId) {
        self.backend.remove(id);
        self.backend.release(id);
    }

    pub fn render(&mut self, scene: &Scene, out: &mut DrawList) -> anyhow::Result<()> {
        self.backend.render(scene, out)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.backend.width()
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.backend.height()
    }

    /// Releases every shape and detaches the backend.
    pub fn shutdown(&mut self, scene: &Scene) {
        for shape in scene.iter() {
            self.backend.release(shape.id);
        }
        self.backend.detach();
        log::info!("renderer {} detached", self.kind());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{Call, Recorder};
    use crate::template::{ShapeKind, TemplateRegistry};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn host(rec: &Recorder) -> RendererHost {
        RendererHost::new(Box::new(rec.clone()), RendererKind::Svg, Viewport::new(320.0, 240.0), 1.0)
    }

    fn scene(n: usize) -> Scene {
        let reg = TemplateRegistry::new();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut scene = Scene::new();
        for _ in 0..n {
            scene.spawn(&mut rng, &ShapeKind::ALL, &reg, 320.0, 240.0);
        }
        scene
    }

    #[test]
    fn new_attaches_requested_kind() {
        let rec = Recorder::default();
        let h = host(&rec);
        assert_eq!(h.kind(), RendererKind::Svg);
        assert_eq!(rec.calls(), vec![Call::Attach(RendererKind::Svg)]);
        assert_eq!((h.width(), h.height()), (320.0, 240.0));
    }

    #[test]
    fn swap_to_same_kind_is_idempotent() {
        let rec = Recorder::default();
        let mut h = host(&rec);
        rec.clear();
        assert!(!h.swap(RendererKind::Svg, &scene(2)));
        assert!(rec.calls().is_empty());
    }

    #[test]
    fn swap_detaches_before_attaching_and_migrates_shapes() {
        let rec = Recorder::default();
        let mut h = host(&rec);
        let scene = scene(2);
        let ids = scene.ids();
        rec.clear();

        assert!(h.swap(RendererKind::Webgl, &scene));
        assert_eq!(h.kind(), RendererKind::Webgl);
        assert_eq!(
            rec.calls(),
            vec![
                Call::Release(RendererKind::Svg, ids[0]),
                Call::Release(RendererKind::Svg, ids[1]),
                Call::Detach(RendererKind::Svg),
                Call::Attach(RendererKind::Webgl),
                Call::Add(RendererKind::Webgl, ids[0]),
                Call::Add(RendererKind::Webgl, ids[1]),
            ]
        );
    }

    #[test]
    fn discard_removes_then_releases() {
        let rec = Recorder::default();
        let mut h = host(&rec);
        rec.clear();
        h.discard(ShapeId(4));
        assert_eq!(
            rec.calls(),
            vec![
                Call::Remove(RendererKind::Svg, ShapeId(4)),
                Call::Release(RendererKind::Svg, ShapeId(4)),
            ]
        );
    }

    #[test]
    fn resize_reattaches_only_on_change() {
        let rec = Recorder::default();
        let mut h = host(&rec);
        rec.clear();
        h.resize(Viewport::new(320.0, 240.0), 1.0);
        assert!(rec.calls().is_empty());
        h.resize(Viewport::new(100.0, 50.0), 1.0);
        assert_eq!(rec.calls(), vec![Call::Attach(RendererKind::Svg)]);
        assert_eq!(h.width(), 100.0);
    }
}
