//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands for one frame
//! - paint in insertion order (later items draw on top)
//! - keep shape-specific helpers isolated per shape file under `scene::shapes`

mod cmd;
mod list;

pub mod shapes;

pub use cmd::DrawCmd;
pub use list::DrawList;
pub use shapes::Stroke;
pub use shapes::image::ImageCmd;
pub use shapes::path::PathCmd;
