mod common;
mod image;
mod path;

pub use image::ImageRenderer;
pub use path::PathRenderer;
