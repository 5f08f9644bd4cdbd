//! Animated 2D shapes demo.
//!
//! The animation core (templates, scene, state, controller, updater) is
//! platform-free; `app` wires it to the engine window and GPU renderers.

pub mod app;
pub mod backend;
pub mod config;
pub mod controller;
pub mod export;
pub mod host;
pub mod scene;
pub mod shape;
pub mod shell;
pub mod state;
pub mod template;
pub mod updater;

use anyhow::Result;
use kinetic_engine::window::Runtime;

pub use app::DemoApp;
pub use config::DemoConfig;
pub use export::{export_svg, write_svg};

/// Opens the demo window and runs until it is closed.
pub fn run(config: DemoConfig) -> Result<()> {
    log::info!(
        "starting: renderer={} count={} shapes={:?} ops={:?}",
        config.renderer,
        config.count,
        config.shapes,
        config.operations
    );
    let app = DemoApp::new(&config, Box::new(backend::NativeBackends));
    Runtime::run(config.runtime_config(), config.gpu_init(), app)
}
