//! Presentation layer
//!
//! The simulation never touches the GPU. Each frame the session hands the
//! presenter a list of textured quads and text runs, then asks it to present.
//! Textures live in a presenter-owned `VisualTable` and are referenced from
//! entities by `VisualHandle`.

pub mod headless;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use headless::{DrawCall, HeadlessPresenter};
pub use pipeline::RenderState;

use glam::Vec2;

use crate::assets::{AssetError, VisualHandle};

/// Everything the game loop needs from a renderer
pub trait Presenter {
    /// Load (or reuse) the texture at `path`
    fn load_visual(&mut self, path: &str) -> Result<VisualHandle, AssetError>;

    /// Queue a textured quad centred at `position`
    fn draw_entity(&mut self, visual: VisualHandle, position: Vec2, extents: Vec2);

    /// Queue a line of bitmap text starting at `position`
    fn draw_text(
        &mut self,
        font: VisualHandle,
        text: &str,
        glyph_size: f32,
        glyph_spacing: f32,
        position: Vec2,
    );

    /// Submit everything queued this frame
    fn present(&mut self);

    /// Drop every loaded visual, returning how many were released
    fn release_visuals(&mut self) -> usize;
}

/// Arena of loaded visuals, indexed by `VisualHandle`
///
/// Loading the same path twice returns the first handle.
#[derive(Debug)]
pub struct VisualTable<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for VisualTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> VisualTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for an already-loaded path
    pub fn find(&self, path: &str) -> Option<VisualHandle> {
        self.entries
            .iter()
            .position(|(p, _)| p == path)
            .map(VisualHandle::from_index)
    }

    /// Return the existing handle for `path`, or load it with `load`
    pub fn get_or_load<E>(
        &mut self,
        path: &str,
        load: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<VisualHandle, E> {
        if let Some(handle) = self.find(path) {
            return Ok(handle);
        }
        let visual = load(path)?;
        self.entries.push((path.to_string(), visual));
        Ok(VisualHandle::from_index(self.entries.len() - 1))
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&T> {
        self.entries.get(handle.index()).map(|(_, v)| v)
    }

    pub fn path(&self, handle: VisualHandle) -> Option<&str> {
        self.entries.get(handle.index()).map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry; outstanding handles become dangling
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }
}
