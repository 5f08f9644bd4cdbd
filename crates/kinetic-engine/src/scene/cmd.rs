use crate::scene::shapes::image::ImageCmd;
use crate::scene::shapes::path::PathCmd;

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a new shape module under `scene::shapes::*`
/// - add a new variant here
/// - implement push helpers inside that shape module
/// - add a matching renderer under `render::shapes::*`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Path(PathCmd),
    Image(ImageCmd),
}
