//! Renderer backends.
//!
//! A backend turns the scene into engine draw commands. It keeps one cached
//! resource per shape between `add` and `release`; `remove` only takes the
//! shape out of the live set.

mod cache;
mod canvas;
mod svg;
mod webgl;

#[cfg(test)]
pub(crate) mod recording;

use kinetic_engine::coords::Viewport;
use kinetic_engine::scene::DrawList;

use crate::scene::Scene;
use crate::shape::{LiveShape, ShapeId};
use crate::state::RendererKind;

pub use cache::ShapeCache;
pub use canvas::CanvasBackend;
pub use svg::{SvgBackend, svg_document};
pub use webgl::WebglBackend;

/// Uniform capability set shared by every renderer kind.
pub trait Backend {
    fn kind(&self) -> RendererKind;

    /// Binds the backend to a drawing surface of `viewport` logical px.
    fn attach(&mut self, viewport: Viewport, scale_factor: f32);

    /// Unbinds from the surface and drops every cached resource.
    fn detach(&mut self);

    fn add(&mut self, shape: &LiveShape);

    fn remove(&mut self, id: ShapeId);

    fn release(&mut self, id: ShapeId);

    /// Emits draw commands for the live shapes of `scene`, in scene order.
    fn render(&mut self, scene: &Scene, out: &mut DrawList) -> anyhow::Result<()>;

    /// Canvas width in logical px; 0 while detached.
    fn width(&self) -> f32;

    /// Canvas height in logical px; 0 while detached.
    fn height(&self) -> f32;
}

/// Builds a fresh backend for a renderer kind.
pub trait BackendFactory {
    fn create(&self, kind: RendererKind) -> Box<dyn Backend>;
}

/// The three native backends.
#[derive(Debug, Default, Copy, Clone)]
pub struct NativeBackends;

impl BackendFactory for NativeBackends {
    fn create(&self, kind: RendererKind) -> Box<dyn Backend> {
        match kind {
            RendererKind::Svg => Box::new(SvgBackend::new()),
            RendererKind::Canvas => Box::new(CanvasBackend::new()),
            RendererKind::Webgl => Box::new(WebglBackend::new()),
        }
    }
}

/// Surface binding shared by the backend implementations.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub(crate) struct Surface {
    pub viewport: Viewport,
    pub scale_factor: f32,
}

impl Surface {
    /// Backing pixmap size in physical px.
    pub fn pixel_size(&self) -> (u32, u32) {
        self.viewport.physical_size(self.scale_factor)
    }
}
