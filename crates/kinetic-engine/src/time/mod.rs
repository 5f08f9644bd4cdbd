//! Time subsystem.
//!
//! Frame timing utilities decoupled from the runtime:
//! - one `FrameClock` per window, `tick()` once per presented frame
//! - `FpsCounter` folds tick deltas into a once-per-second rate

mod fps;
mod frame_clock;

pub use fps::FpsCounter;
pub use frame_clock::{FrameClock, FrameTime};
