use std::fmt::Write as _;

use anyhow::Context;
use kinetic_engine::coords::Viewport;
use kinetic_engine::paint::Color;
use kinetic_engine::scene::DrawList;
use resvg::{tiny_skia, usvg};

use crate::scene::Scene;
use crate::shape::{LiveShape, STROKE_WIDTH, ShapeId};
use crate::state::RendererKind;

use super::{Backend, ShapeCache, Surface};

/// Serializes the scene to SVG markup each frame and rasterizes it with resvg.
///
/// The cached per-shape resource is the shape's style attribute string.
pub struct SvgBackend {
    surface: Option<Surface>,
    styles: ShapeCache<String>,
    options: usvg::Options<'static>,
    markup: String,
}

impl SvgBackend {
    pub fn new() -> Self {
        Self {
            surface: None,
            styles: ShapeCache::new(),
            options: usvg::Options::default(),
            markup: String::new(),
        }
    }

    /// Markup of the last rendered frame.
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for SvgBackend {
    fn kind(&self) -> RendererKind {
        RendererKind::Svg
    }

    fn attach(&mut self, viewport: Viewport, scale_factor: f32) {
        self.surface = Some(Surface { viewport, scale_factor });
    }

    fn detach(&mut self) {
        self.surface = None;
        self.styles.clear();
        self.markup.clear();
    }

    fn add(&mut self, shape: &LiveShape) {
        self.styles.insert(shape.id, style_attrs(shape));
    }

    fn remove(&mut self, id: ShapeId) {
        self.styles.remove(id);
    }

    fn release(&mut self, id: ShapeId) {
        self.styles.release(id);
    }

    fn render(&mut self, scene: &Scene, out: &mut DrawList) -> anyhow::Result<()> {
        let surface = self.surface.context("svg backend is not attached")?;
        if !surface.viewport.is_valid() {
            return Ok(());
        }

        self.markup.clear();
        let styles = &self.styles;
        write_document(
            &mut self.markup,
            surface.viewport,
            scene.iter().filter_map(|s| styles.live(s.id).map(|st| (s, st.as_str()))),
        );

        let tree = usvg::Tree::from_str(&self.markup, &self.options)
            .context("failed to parse scene markup")?;

        let (pw, ph) = surface.pixel_size();
        let mut pixmap =
            tiny_skia::Pixmap::new(pw, ph).context("failed to allocate svg pixmap")?;
        let s = surface.scale_factor;
        resvg::render(&tree, tiny_skia::Transform::from_scale(s, s), &mut pixmap.as_mut());

        out.push_image(surface.viewport.rect(), pw, ph, pixmap.take());
        Ok(())
    }

    fn width(&self) -> f32 {
        self.surface.map_or(0.0, |s| s.viewport.width)
    }

    fn height(&self) -> f32 {
        self.surface.map_or(0.0, |s| s.viewport.height)
    }
}

/// Standalone SVG document for every shape in `scene`.
pub fn svg_document(scene: &Scene, viewport: Viewport) -> String {
    let styles: Vec<String> = scene.iter().map(style_attrs).collect();
    let mut doc = String::new();
    write_document(
        &mut doc,
        viewport,
        scene.iter().zip(styles.iter().map(String::as_str)),
    );
    doc
}

fn write_document<'a>(
    out: &mut String,
    viewport: Viewport,
    shapes: impl Iterator<Item = (&'a LiveShape, &'a str)>,
) {
    let (w, h) = (viewport.width, viewport.height);
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    for (shape, style) in shapes {
        out.push_str("  <path d=\"");
        write_path_data(out, shape);
        let _ = writeln!(out, "\" {style}/>");
    }
    out.push_str("</svg>\n");
}

fn write_path_data(out: &mut String, shape: &LiveShape) {
    for (i, p) in shape.world_points().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(out, "{cmd}{:.2} {:.2} ", p.x, p.y);
    }
    out.push('Z');
}

fn style_attrs(shape: &LiveShape) -> String {
    format!(
        r#"fill="{}" stroke="{}" stroke-width="{STROKE_WIDTH}""#,
        rgb(shape.fill),
        rgb(shape.stroke)
    )
}

fn rgb(c: Color) -> String {
    let [r, g, b, _] = c.to_rgba8();
    format!("rgb({r}, {g}, {b})")
}
