use super::DrawCmd;

/// Recorded draw stream for a frame.
///
/// Items paint back-to-front in the order they were pushed. `clear()` keeps the
/// allocation so a list reused across frames stops allocating once warmed.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(cmd);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns items in paint order.
    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }
}
