use crate::coords::Rect;
use crate::scene::{DrawCmd, DrawList};

/// CPU-rastered image payload.
///
/// `pixels` is premultiplied RGBA8, row-major, `width * height * 4` bytes.
/// `dest` is where the image lands in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub dest: Rect,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageCmd {
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == self.width as usize * self.height as usize * 4
    }
}

impl DrawList {
    /// Records an image blit.
    #[inline]
    pub fn push_image(&mut self, dest: Rect, width: u32, height: u32, pixels: Vec<u8>) {
        self.push(DrawCmd::Image(ImageCmd { dest, width, height, pixels }));
    }
}
