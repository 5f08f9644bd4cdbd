use kinetic_engine::coords::Vec2;
use kinetic_engine::device::GpuInit;
use kinetic_engine::paint::Color;
use kinetic_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

use crate::state::{AnimationState, Operation, OperationSet, RendererKind, ShapeFilter};
use crate::template::ShapeKind;

/// Demo configuration: window, initial animation state, randomness.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub title: String,
    /// Logical px.
    pub width: f64,
    pub height: f64,

    pub renderer: RendererKind,
    pub shapes: Vec<ShapeKind>,
    pub operations: Vec<Operation>,
    pub count: u32,
    pub velocity: Vec2,
    pub spin: f32,

    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    pub background: Color,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "kinetic".to_string(),
            width: 1280.0,
            height: 720.0,
            renderer: RendererKind::Svg,
            shapes: vec![ShapeKind::Triangle],
            operations: Vec::new(),
            count: 0,
            velocity: Vec2::new(2.0, 0.0),
            spin: std::f32::consts::PI / 30.0,
            seed: None,
            background: Color::from_rgb8(34, 34, 34),
        }
    }
}

impl DemoConfig {
    pub fn initial_state(&self) -> AnimationState {
        let mut state = AnimationState::new(
            self.renderer,
            ShapeFilter::only(&self.shapes),
            OperationSet::only(&self.operations),
        );
        state.target_count = self.count;
        state.velocity = self.velocity;
        state.spin = self.spin;
        state
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        }
    }

    /// Linear surface so CPU-rastered bytes and GPU path colors match.
    pub fn gpu_init(&self) -> GpuInit {
        GpuInit { prefer_srgb: false, ..GpuInit::default() }
    }
}
