//! Presenter without a GPU
//!
//! Decodes textures like the real renderer would and records every draw so
//! the native demo and tests can see what a frame contained.

use glam::Vec2;

use super::{Presenter, VisualTable};
use crate::assets::{AssetError, ImageData, VisualHandle};

/// One queued draw
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Entity {
        visual: VisualHandle,
        position: Vec2,
        extents: Vec2,
    },
    Text {
        font: VisualHandle,
        text: String,
        glyph_size: f32,
        glyph_spacing: f32,
        position: Vec2,
    },
}

#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    visuals: VisualTable<ImageData>,
    pending: Vec<DrawCall>,
    last_frame: Vec<DrawCall>,
    frames: u64,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws submitted by the most recent `present`
    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn loaded_visuals(&self) -> usize {
        self.visuals.len()
    }

    pub fn visual_path(&self, handle: VisualHandle) -> Option<&str> {
        self.visuals.path(handle)
    }

    /// Text runs in the last presented frame
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.last_frame.iter().filter_map(|call| match call {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            DrawCall::Entity { .. } => None,
        })
    }
}

impl Presenter for HeadlessPresenter {
    fn load_visual(&mut self, path: &str) -> Result<VisualHandle, AssetError> {
        self.visuals.get_or_load(path, ImageData::load)
    }

    fn draw_entity(&mut self, visual: VisualHandle, position: Vec2, extents: Vec2) {
        self.pending.push(DrawCall::Entity {
            visual,
            position,
            extents,
        });
    }

    fn draw_text(
        &mut self,
        font: VisualHandle,
        text: &str,
        glyph_size: f32,
        glyph_spacing: f32,
        position: Vec2,
    ) {
        self.pending.push(DrawCall::Text {
            font,
            text: text.to_string(),
            glyph_size,
            glyph_spacing,
            position,
        });
    }

    fn present(&mut self) {
        self.last_frame = std::mem::take(&mut self.pending);
        self.frames += 1;
    }

    fn release_visuals(&mut self) -> usize {
        self.visuals.clear()
    }
}
