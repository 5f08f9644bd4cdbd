use kinetic_engine::core::{App, AppControl, FrameCtx};
use kinetic_engine::coords::Viewport;
use kinetic_engine::paint::Color;
use kinetic_engine::render::shapes::{ImageRenderer, PathRenderer};
use kinetic_engine::scene::DrawList;
use kinetic_engine::time::FpsCounter;
use winit::event::WindowEvent;

use crate::backend::BackendFactory;
use crate::config::DemoConfig;
use crate::controller::Controller;
use crate::host::RendererHost;
use crate::scene::Scene;
use crate::shell::{Shell, ShellAction};
use crate::state::AnimationState;
use crate::template::TemplateRegistry;
use crate::updater::Updater;

/// The windowed demo: input shell → controller → updater → backend → GPU.
pub struct DemoApp {
    state: AnimationState,
    scene: Scene,
    registry: TemplateRegistry,
    updater: Updater,
    controller: Controller,
    shell: Shell,
    host: RendererHost,

    draw_list: DrawList,
    paths: PathRenderer,
    images: ImageRenderer,

    fps: FpsCounter,
    title: String,
    background: Color,
    playing: bool,
    torn_down: bool,
}

impl DemoApp {
    pub fn new(config: &DemoConfig, factory: Box<dyn BackendFactory>) -> Self {
        let state = config.initial_state();
        // Real surface size arrives with the first frame.
        let host = RendererHost::new(factory, state.renderer, Viewport::default(), 1.0);

        Self {
            state,
            scene: Scene::new(),
            registry: TemplateRegistry::new(),
            updater: Updater::new(config.seed),
            controller: Controller::new(),
            shell: Shell::new(),
            host,
            draw_list: DrawList::new(),
            paths: PathRenderer::new(),
            images: ImageRenderer::new(),
            fps: FpsCounter::new(),
            title: config.title.clone(),
            background: config.background,
            playing: true,
            torn_down: false,
        }
    }

    /// Stops the animation after the current frame.
    fn stop(&mut self) {
        if self.playing {
            log::info!("stopping after frame {}", self.state.frame());
        }
        self.playing = false;
        self.controller.unregister();
    }

    fn teardown(&mut self) {
        self.stop();
        if !self.torn_down {
            self.host.shutdown(&self.scene);
            self.torn_down = true;
        }
    }

    fn window_title(&self) -> String {
        let ops: Vec<&str> = self.state.operations.enabled().iter().map(|op| op.name()).collect();
        let ops = if ops.is_empty() { "none".to_string() } else { ops.join("+") };
        let mut title = format!(
            "{} | {} | {}/{} | {} | {:.0} fps",
            self.title,
            self.host.kind(),
            self.scene.len(),
            self.state.target_count,
            ops,
            self.fps.fps(),
        );
        if let Some(pending) = self.shell.pending_count() {
            title.push_str(&format!(" | count: {pending}_"));
        }
        title
    }
}

impl App for DemoApp {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if matches!(event, WindowEvent::CloseRequested) {
            self.teardown();
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.torn_down {
            return AppControl::Exit;
        }

        for ev in &ctx.input_frame.events {
            match self.shell.handle(ev, &self.state) {
                Some(ShellAction::Ui(ui)) => self.controller.apply(&mut self.state, ui),
                Some(ShellAction::Exit) => self.stop(),
                None => {}
            }
        }

        self.host.resize(ctx.window.viewport(), ctx.window.scale_factor());
        self.updater
            .step(&mut self.state, &mut self.scene, &mut self.host, &self.registry);

        self.draw_list.clear();
        if let Err(e) = self.host.render(&self.scene, &mut self.draw_list) {
            log::warn!("frame {} skipped: {e:#}", self.state.frame());
            self.draw_list.clear();
        }

        self.fps.record(ctx.time.dt);
        ctx.window.set_title(&self.window_title());

        let (paths, images, list) = (&mut self.paths, &mut self.images, &self.draw_list);
        let control = ctx.render(self.background, |rctx, target| {
            images.render(rctx, target, list);
            paths.render(rctx, target, list);
        });

        if control == AppControl::Exit || !self.playing {
            self.teardown();
            return AppControl::Exit;
        }
        AppControl::Continue
    }

    fn on_exit(&mut self) {
        self.teardown();
    }
}
