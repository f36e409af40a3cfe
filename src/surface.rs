//! Render surface and loading indicator seams.

use std::cell::Cell;

/// A drawing surface whose backing buffer follows the host window.
pub trait RenderSurface {
    /// Re-fit the backing buffer to the host's new size in physical pixels.
    fn resize_to_host(&mut self, width: u32, height: u32);

    fn size(&self) -> (u32, u32);
}

/// Something that can show "loading" to the user.
pub trait LoadingIndicator {
    fn show_loading(&self);
    fn hide_loading(&self);
}

/// Shows the indicator for as long as it lives.
///
/// Hiding happens in `Drop`, so every exit path of a transition (success,
/// failure, early return) hides what it showed.
#[must_use = "the indicator is hidden as soon as the scope is dropped"]
pub struct LoadingScope<'a> {
    indicator: &'a dyn LoadingIndicator,
}

impl<'a> LoadingScope<'a> {
    pub fn new(indicator: &'a dyn LoadingIndicator) -> Self {
        indicator.show_loading();
        Self { indicator }
    }
}

impl Drop for LoadingScope<'_> {
    fn drop(&mut self) {
        self.indicator.hide_loading();
    }
}

/// Loading indicator state read by the renderer each frame.
///
/// Counts nested shows so overlapping scopes keep it visible until the last
/// one ends.
#[derive(Debug, Default)]
pub struct LoadingFlag {
    depth: Cell<u32>,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.depth.get() > 0
    }
}

impl LoadingIndicator for LoadingFlag {
    fn show_loading(&self) {
        if self.depth.get() == 0 {
            log::debug!("loading indicator shown");
        }
        self.depth.set(self.depth.get() + 1);
    }

    fn hide_loading(&self) {
        let depth = self.depth.get().saturating_sub(1);
        self.depth.set(depth);
        if depth == 0 {
            log::debug!("loading indicator hidden");
        }
    }
}
