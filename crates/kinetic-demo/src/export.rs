//! Headless SVG export: runs the animation without a window.

use std::path::Path;

use anyhow::{Context, Result};
use kinetic_engine::coords::Viewport;

use crate::backend::{NativeBackends, svg_document};
use crate::config::DemoConfig;
use crate::host::RendererHost;
use crate::scene::Scene;
use crate::state::RendererKind;
use crate::template::TemplateRegistry;
use crate::updater::Updater;

/// Steps the configured animation `frames` times on the SVG backend and
/// returns the markup of the final scene.
///
/// The target count is reached by reconciliation only, one shape per frame.
pub fn export_svg(config: &DemoConfig, frames: u32) -> Result<String> {
    let viewport = Viewport::new(config.width as f32, config.height as f32);
    anyhow::ensure!(viewport.is_valid(), "export size must be positive, got {}x{}", config.width, config.height);

    let mut state = config.initial_state();
    state.renderer = RendererKind::Svg;

    let registry = TemplateRegistry::new();
    let mut scene = Scene::new();
    let mut host = RendererHost::new(Box::new(NativeBackends), RendererKind::Svg, viewport, 1.0);
    let mut updater = Updater::new(config.seed);

    for _ in 0..frames {
        updater.step(&mut state, &mut scene, &mut host, &registry);
    }

    if (scene.len() as u32) < state.target_count {
        log::warn!(
            "export stopped at {} of {} shapes; raise --frames to reach the count",
            scene.len(),
            state.target_count
        );
    }

    let doc = svg_document(&scene, viewport);
    host.shutdown(&scene);
    Ok(doc)
}

/// Runs [`export_svg`] and writes the document to `path`.
pub fn write_svg(config: &DemoConfig, frames: u32, path: &Path) -> Result<()> {
    let doc = export_svg(config, frames)?;
    std::fs::write(path, doc).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("exported {} frames to {}", frames, path.display());
    Ok(())
}
