use anyhow::Context;
use kinetic_engine::coords::Viewport;
use kinetic_engine::paint::Color;
use kinetic_engine::scene::{DrawList, Stroke};

use crate::scene::Scene;
use crate::shape::{LiveShape, STROKE_WIDTH, ShapeId};
use crate::state::RendererKind;

use super::{Backend, ShapeCache, Surface};

/// GPU backend: one path command per shape, tessellated by the engine's
/// `PathRenderer`.
pub struct WebglBackend {
    surface: Option<Surface>,
    colors: ShapeCache<(Color, Color)>,
}

impl WebglBackend {
    pub fn new() -> Self {
        Self { surface: None, colors: ShapeCache::new() }
    }
}

impl Default for WebglBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for WebglBackend {
    fn kind(&self) -> RendererKind {
        RendererKind::Webgl
    }

    fn attach(&mut self, viewport: Viewport, scale_factor: f32) {
        self.surface = Some(Surface { viewport, scale_factor });
    }

    fn detach(&mut self) {
        self.surface = None;
        self.colors.clear();
    }

    fn add(&mut self, shape: &LiveShape) {
        self.colors.insert(shape.id, (shape.fill, shape.stroke));
    }

    fn remove(&mut self, id: ShapeId) {
        self.colors.remove(id);
    }

    fn release(&mut self, id: ShapeId) {
        self.colors.release(id);
    }

    fn render(&mut self, scene: &Scene, out: &mut DrawList) -> anyhow::Result<()> {
        self.surface.context("webgl backend is not attached")?;

        for shape in scene.iter() {
            let Some(&(fill, stroke)) = self.colors.live(shape.id) else { continue };
            out.push_path(
                shape.world_points().collect(),
                shape.position,
                fill,
                Some(Stroke::new(STROKE_WIDTH, stroke)),
            );
        }
        Ok(())
    }

    fn width(&self) -> f32 {
        self.surface.map_or(0.0, |s| s.viewport.width)
    }

    fn height(&self) -> f32 {
        self.surface.map_or(0.0, |s| s.viewport.height)
    }
}
