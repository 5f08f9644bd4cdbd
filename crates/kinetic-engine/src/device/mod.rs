//! wgpu device, queue and window surface.

mod gpu;
mod surface;

pub use gpu::Gpu;

/// Settings used when the window surface and device are created.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an `*Srgb` surface format if the adapter offers one.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    pub power_preference: wgpu::PowerPreference,
    pub required_limits: wgpu::Limits,
    /// Hint only; the platform may clamp it.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            // Fifo paces `on_frame` to the display refresh.
            present_mode: wgpu::PresentMode::Fifo,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// What the caller should do after a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was configured again; the next frame may succeed.
    Reconfigured,
    SkipFrame,
    /// Unrecoverable (out of memory).
    Fatal,
}

/// Surface texture plus encoder for one frame. Present it promptly: the next
/// acquisition waits on it.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
