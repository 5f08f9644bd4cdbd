/// Frames-per-second estimate, refreshed once per accumulated second.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one frame delta (seconds) in. Returns `true` when the estimate changed.
    pub fn record(&mut self, dt: f32) -> bool {
        self.frames += 1;
        self.elapsed += dt.max(0.0);
        if self.elapsed < 1.0 {
            return false;
        }
        self.fps = self.frames as f32 / self.elapsed;
        self.frames = 0;
        self.elapsed = 0.0;
        true
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
