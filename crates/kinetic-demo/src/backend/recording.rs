//! Backend test double that records every call.

use std::cell::RefCell;
use std::rc::Rc;

use kinetic_engine::coords::Viewport;
use kinetic_engine::scene::DrawList;

use crate::scene::Scene;
use crate::shape::{LiveShape, ShapeId};
use crate::state::RendererKind;

use super::{Backend, BackendFactory};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Attach(RendererKind),
    Detach(RendererKind),
    Add(RendererKind, ShapeId),
    Remove(RendererKind, ShapeId),
    Release(RendererKind, ShapeId),
    Render(RendererKind, usize),
}

pub(crate) type CallLog = Rc<RefCell<Vec<Call>>>;

pub(crate) struct RecordingBackend {
    kind: RendererKind,
    viewport: Option<Viewport>,
    log: CallLog,
}

impl Backend for RecordingBackend {
    fn kind(&self) -> RendererKind {
        self.kind
    }

    fn attach(&mut self, viewport: Viewport, _scale_factor: f32) {
        self.viewport = Some(viewport);
        self.log.borrow_mut().push(Call::Attach(self.kind));
    }

    fn detach(&mut self) {
        self.viewport = None;
        self.log.borrow_mut().push(Call::Detach(self.kind));
    }

    fn add(&mut self, shape: &LiveShape) {
        self.log.borrow_mut().push(Call::Add(self.kind, shape.id));
    }

    fn remove(&mut self, id: ShapeId) {
        self.log.borrow_mut().push(Call::Remove(self.kind, id));
    }

    fn release(&mut self, id: ShapeId) {
        self.log.borrow_mut().push(Call::Release(self.kind, id));
    }

    fn render(&mut self, scene: &Scene, _out: &mut DrawList) -> anyhow::Result<()> {
        self.log.borrow_mut().push(Call::Render(self.kind, scene.len()));
        Ok(())
    }

    fn width(&self) -> f32 {
        self.viewport.map_or(0.0, |v| v.width)
    }

    fn height(&self) -> f32 {
        self.viewport.map_or(0.0, |v| v.height)
    }
}

/// Factory whose backends all append to one shared log.
#[derive(Default, Clone)]
pub(crate) struct Recorder {
    pub log: CallLog,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl BackendFactory for Recorder {
    fn create(&self, kind: RendererKind) -> Box<dyn Backend> {
        Box::new(RecordingBackend {
            kind,
            viewport: None,
            log: Rc::clone(&self.log),
        })
    }
}
