use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList, PathCmd};

use super::common::{
    create_pipeline, create_viewport_ubo, grown_capacity, viewport_ubo_entry, write_viewport_ubo,
};

/// Renderer for `DrawCmd::Path`.
///
/// Fills are triangulated as a fan around `PathCmd::center`; strokes are one
/// quad per edge, extended by half the stroke width so corners close.
/// All paths in a list go out in a single draw call, in list order.
#[derive(Default)]
pub struct PathRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,

    // Reused across frames.
    scratch: Vec<PathVertex>,
}

impl PathRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draw_list: &DrawList) {
        self.scratch.clear();
        for cmd in draw_list.items() {
            if let DrawCmd::Path(path) = cmd {
                tessellate(path, &mut self.scratch);
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.ensure_capacity(ctx, self.scratch.len());

        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        write_viewport_ubo(ctx, ubo);

        let Some(vbo) = self.vbo.as_ref() else { return };
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.scratch));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = target.begin_load_pass("kinetic path pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..self.scratch.len() as u32, 0..1);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("kinetic path shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/path.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("kinetic path bgl"),
                entries: &[viewport_ubo_entry(0)],
            });

        let pipeline = create_pipeline(
            ctx,
            "kinetic path pipeline",
            &shader,
            &[&bind_group_layout],
            &[PathVertex::layout()],
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = create_viewport_ubo(ctx, "kinetic path viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("kinetic path bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }
        let new_cap = grown_capacity(required);
        self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("kinetic path vbo"),
            size: (new_cap * std::mem::size_of::<PathVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = new_cap;
    }
}

// ── tessellation ──────────────────────────────────────────────────────────

/// Appends fill then stroke triangles for `path`.
///
/// Paths with fewer than 3 points or non-finite coordinates produce nothing.
fn tessellate(path: &PathCmd, out: &mut Vec<PathVertex>) {
    let n = path.points.len();
    if n < 3 || !path.center.is_finite() || !path.points.iter().all(|p| p.is_finite()) {
        return;
    }

    let fill = path.fill.to_array();
    for i in 0..n {
        let a = path.points[i];
        let b = path.points[(i + 1) % n];
        out.extend([
            PathVertex::new(path.center, fill),
            PathVertex::new(a, fill),
            PathVertex::new(b, fill),
        ]);
    }

    let Some(stroke) = path.stroke.filter(|s| s.width > 0.0) else { return };
    let color = stroke.color.to_array();
    let half = stroke.width * 0.5;

    for i in 0..n {
        let a = path.points[i];
        let b = path.points[(i + 1) % n];
        let edge = b - a;
        let len = edge.length();
        if len <= f32::EPSILON {
            continue;
        }
        let dir = edge / len;
        let normal = Vec2::new(-dir.y, dir.x) * half;
        let a = a - dir * half;
        let b = b + dir * half;

        let (a0, a1, b0, b1) = (a + normal, a - normal, b + normal, b - normal);
        out.extend([
            PathVertex::new(a0, color),
            PathVertex::new(a1, color),
            PathVertex::new(b1, color),
            PathVertex::new(a0, color),
            PathVertex::new(b1, color),
            PathVertex::new(b0, color),
        ]);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Vertex layout (24 bytes):
///
///  offset  0  pos    [f32; 2]  loc 0  (logical px)
///  offset  8  color  [f32; 4]  loc 1  (premultiplied)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct PathVertex {
    pos: [f32; 2],
    color: [f32; 4],
}

impl PathVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4  // color
    ];

    #[inline]
    fn new(p: Vec2, color: [f32; 4]) -> Self {
        Self { pos: [p.x, p.y], color }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PathVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::scene::Stroke;

    fn square(stroke: Option<Stroke>) -> PathCmd {
        PathCmd {
            points: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(0.0, 10.0),
            ],
            center: Vec2::new(5.0, 5.0),
            fill: Color::from_rgb8(255, 0, 0),
            stroke,
        }
    }

    // ── fill ────────────────────────────────────────────────────────────────

    #[test]
    fn fill_is_one_fan_triangle_per_edge() {
        let mut out = Vec::new();
        tessellate(&square(None), &mut out);
        assert_eq!(out.len(), 4 * 3);
        for tri in out.chunks(3) {
            assert_eq!(tri[0].pos, [5.0, 5.0]);
        }
        // Last triangle closes the outline back to the first point.
        assert_eq!(out[11].pos, [0.0, 0.0]);
    }

    #[test]
    fn degenerate_paths_emit_nothing() {
        let mut out = Vec::new();
        let mut p = square(None);
        p.points.truncate(2);
        tessellate(&p, &mut out);
        assert!(out.is_empty());

        let mut p = square(None);
        p.points[1].x = f32::NAN;
        tessellate(&p, &mut out);
        assert!(out.is_empty());
    }

    // ── stroke ──────────────────────────────────────────────────────────────

    #[test]
    fn stroke_adds_a_quad_per_edge() {
        let mut out = Vec::new();
        tessellate(&square(Some(Stroke::new(2.0, Color::WHITE))), &mut out);
        assert_eq!(out.len(), 4 * 3 + 4 * 6);
        assert!(out[12..].iter().all(|v| v.color == Color::WHITE.to_array()));
    }

    #[test]
    fn stroke_quad_straddles_the_edge() {
        let mut out = Vec::new();
        tessellate(&square(Some(Stroke::new(2.0, Color::WHITE))), &mut out);
        // First edge runs (0,0) → (10,0); its quad spans y in [-1, 1], x in [-1, 11].
        let quad = &out[12..18];
        let ys: Vec<f32> = quad.iter().map(|v| v.pos[1]).collect();
        let xs: Vec<f32> = quad.iter().map(|v| v.pos[0]).collect();
        assert!(ys.iter().all(|y| (y.abs() - 1.0).abs() < 1e-5));
        assert!(xs.iter().all(|x| (*x + 1.0).abs() < 1e-5 || (*x - 11.0).abs() < 1e-5));
    }

    #[test]
    fn zero_width_stroke_is_skipped() {
        let mut out = Vec::new();
        tessellate(&square(Some(Stroke::new(0.0, Color::WHITE))), &mut out);
        assert_eq!(out.len(), 12);
    }
}
