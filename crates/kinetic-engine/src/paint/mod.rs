//! Paint model shared between the demo and renderers.
//!
//! Shapes carry solid colors only; geometry types remain in `coords`.

pub mod color;

pub use color::Color;
