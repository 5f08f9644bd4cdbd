//! Kinetic engine crate.
//!
//! Owns the platform + GPU runtime pieces the demo runs on: window loop,
//! input tracking, frame timing, and the renderers that consume a `DrawList`.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
