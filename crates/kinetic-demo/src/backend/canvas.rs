use anyhow::Context;
use kinetic_engine::coords::Viewport;
use kinetic_engine::paint::Color;
use kinetic_engine::scene::DrawList;
use resvg::tiny_skia;

use crate::scene::Scene;
use crate::shape::{LiveShape, STROKE_WIDTH, ShapeId};
use crate::state::RendererKind;

use super::{Backend, ShapeCache, Surface};

/// Immediate-mode raster backend: fills and strokes straight into a pixmap.
pub struct CanvasBackend {
    surface: Option<Surface>,
    paints: ShapeCache<ShapePaint>,
    pixmap: Option<tiny_skia::Pixmap>,
}

struct ShapePaint {
    fill: tiny_skia::Paint<'static>,
    stroke: tiny_skia::Paint<'static>,
}

impl ShapePaint {
    fn new(shape: &LiveShape) -> Self {
        Self { fill: solid(shape.fill), stroke: solid(shape.stroke) }
    }
}

impl CanvasBackend {
    pub fn new() -> Self {
        Self {
            surface: None,
            paints: ShapeCache::new(),
            pixmap: None,
        }
    }
}

impl Default for CanvasBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for CanvasBackend {
    fn kind(&self) -> RendererKind {
        RendererKind::Canvas
    }

    fn attach(&mut self, viewport: Viewport, scale_factor: f32) {
        let surface = Surface { viewport, scale_factor };
        let (pw, ph) = surface.pixel_size();
        // Reallocated on size change only.
        if self.pixmap.as_ref().is_none_or(|p| (p.width(), p.height()) != (pw, ph)) {
            self.pixmap = tiny_skia::Pixmap::new(pw, ph);
        }
        self.surface = Some(surface);
    }

    fn detach(&mut self) {
        self.surface = None;
        self.pixmap = None;
        self.paints.clear();
    }

    fn add(&mut self, shape: &LiveShape) {
        self.paints.insert(shape.id, ShapePaint::new(shape));
    }

    fn remove(&mut self, id: ShapeId) {
        self.paints.remove(id);
    }

    fn release(&mut self, id: ShapeId) {
        self.paints.release(id);
    }

    fn render(&mut self, scene: &Scene, out: &mut DrawList) -> anyhow::Result<()> {
        let surface = self.surface.context("canvas backend is not attached")?;
        if !surface.viewport.is_valid() {
            return Ok(());
        }
        let pixmap = self.pixmap.as_mut().context("canvas pixmap was not allocated")?;

        pixmap.fill(tiny_skia::Color::TRANSPARENT);

        let s = surface.scale_factor;
        let transform = tiny_skia::Transform::from_scale(s, s);
        let stroke = tiny_skia::Stroke { width: STROKE_WIDTH, ..Default::default() };

        for shape in scene.iter() {
            let Some(paint) = self.paints.live(shape.id) else { continue };
            let Some(path) = outline(shape) else { continue };

            pixmap.fill_path(&path, &paint.fill, tiny_skia::FillRule::Winding, transform, None);
            pixmap.stroke_path(&path, &paint.stroke, &stroke, transform, None);
        }

        out.push_image(
            surface.viewport.rect(),
            pixmap.width(),
            pixmap.height(),
            pixmap.data().to_vec(),
        );
        Ok(())
    }

    fn width(&self) -> f32 {
        self.surface.map_or(0.0, |s| s.viewport.width)
    }

    fn height(&self) -> f32 {
        self.surface.map_or(0.0, |s| s.viewport.height)
    }
}

/// Closed outline in logical px; `None` for degenerate shapes.
fn outline(shape: &LiveShape) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for (i, p) in shape.world_points().enumerate() {
        if i == 0 {
            pb.move_to(p.x, p.y);
        } else {
            pb.line_to(p.x, p.y);
        }
    }
    pb.close();
    pb.finish()
}

fn solid(c: Color) -> tiny_skia::Paint<'static> {
    let [r, g, b, a] = c.to_rgba8();
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_engine::coords::Vec2;
    use kinetic_engine::scene::DrawCmd;

    use crate::template::{ShapeKind, TemplateRegistry};

    fn square(id: u64, at: Vec2, fill: Color) -> LiveShape {
        let reg = TemplateRegistry::new();
        LiveShape::new(ShapeId(id), ShapeKind::Square, reg.vertices(ShapeKind::Square), at, 0.0, fill)
    }

    fn pixel(list: &DrawList, x: usize, y: usize) -> [u8; 4] {
        let DrawCmd::Image(img) = &list.items()[0] else { panic!("expected image") };
        let i = (y * img.width as usize + x) * 4;
        [img.pixels[i], img.pixels[i + 1], img.pixels[i + 2], img.pixels[i + 3]]
    }

    #[test]
    fn later_shapes_paint_over_earlier_ones() {
        let mut scene = Scene::new();
        scene.push(square(0, Vec2::new(50.0, 50.0), Color::from_rgb8(255, 0, 0)));
        scene.push(square(1, Vec2::new(60.0, 50.0), Color::from_rgb8(0, 0, 255)));

        let mut b = CanvasBackend::new();
        b.attach(Viewport::new(120.0, 100.0), 1.0);
        for s in scene.iter() {
            b.add(s);
        }

        let mut list = DrawList::new();
        b.render(&scene, &mut list).unwrap();
        assert_eq!(pixel(&list, 30, 50), [255, 0, 0, 255]);
        assert_eq!(pixel(&list, 60, 50), [0, 0, 255, 255]);
        assert_eq!(pixel(&list, 110, 5), [0, 0, 0, 0]);
    }

    #[test]
    fn shapes_never_added_are_not_drawn() {
        let mut scene = Scene::new();
        scene.push(square(0, Vec2::new(50.0, 50.0), Color::from_rgb8(255, 0, 0)));

        let mut b = CanvasBackend::new();
        b.attach(Viewport::new(100.0, 100.0), 1.0);
        let mut list = DrawList::new();
        b.render(&scene, &mut list).unwrap();
        assert_eq!(pixel(&list, 50, 50), [0, 0, 0, 0]);
    }

    #[test]
    fn frames_start_clear() {
        let mut scene = Scene::new();
        scene.push(square(0, Vec2::new(50.0, 50.0), Color::from_rgb8(255, 0, 0)));

        let mut b = CanvasBackend::new();
        b.attach(Viewport::new(100.0, 100.0), 1.0);
        b.add(scene.iter().next().unwrap());
        let mut list = DrawList::new();
        b.render(&scene, &mut list).unwrap();

        b.remove(ShapeId(0));
        let mut list = DrawList::new();
        b.render(&scene, &mut list).unwrap();
        assert_eq!(pixel(&list, 50, 50), [0, 0, 0, 0]);
    }

    #[test]
    fn detach_drops_cache() {
        let mut b = CanvasBackend::new();
        b.attach(Viewport::new(10.0, 10.0), 1.0);
        b.add(&square(0, Vec2::new(5.0, 5.0), Color::WHITE));
        b.detach();
        assert!(b.paints.is_empty());
        assert_eq!(b.height(), 0.0);
    }
}
