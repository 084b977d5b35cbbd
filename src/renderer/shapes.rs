//! Quad generation for sprites and bitmap text

use glam::Vec2;

use super::vertex::Vertex;
use crate::consts::{VIEW_HALF_HEIGHT, VIEW_HALF_WIDTH};

/// Glyph cells per row/column in the font atlas
pub const FONT_GRID: u32 = 16;

/// Two triangles covering a box centred at `center`, full texture mapped
pub fn sprite_quad(center: Vec2, extents: Vec2) -> [Vertex; 6] {
    let h = extents * 0.5;
    let (l, r, b, t) = (center.x - h.x, center.x + h.x, center.y - h.y, center.y + h.y);
    [
        Vertex::new(l, t, 0.0, 0.0),
        Vertex::new(l, b, 0.0, 1.0),
        Vertex::new(r, t, 1.0, 0.0),
        Vertex::new(r, b, 1.0, 1.0),
        Vertex::new(r, t, 1.0, 0.0),
        Vertex::new(l, b, 0.0, 1.0),
    ]
}

/// Quads for a line of text from a 16x16 ASCII atlas
///
/// Glyph `i` is centred `(glyph_size + glyph_spacing) * i` to the right of
/// `position`. Negative spacing packs glyphs tighter than their cell size.
pub fn text_quads(text: &str, glyph_size: f32, glyph_spacing: f32, position: Vec2) -> Vec<Vertex> {
    let cell = 1.0 / FONT_GRID as f32;
    let half = 0.5 * glyph_size;
    let mut vertices = Vec::with_capacity(text.len() * 6);

    for (i, byte) in text.bytes().enumerate() {
        let index = byte as u32;
        let offset = position.x + (glyph_size + glyph_spacing) * i as f32;
        let u = (index % FONT_GRID) as f32 * cell;
        let v = (index / FONT_GRID) as f32 * cell;
        let (l, r) = (offset - half, offset + half);
        let (b, t) = (position.y - half, position.y + half);

        vertices.extend_from_slice(&[
            Vertex::new(l, t, u, v),
            Vertex::new(l, b, u, v + cell),
            Vertex::new(r, t, u + cell, v),
            Vertex::new(r, b, u + cell, v + cell),
            Vertex::new(r, t, u + cell, v),
            Vertex::new(l, b, u, v + cell),
        ]);
    }

    vertices
}

/// Map world coordinates to normalized device coordinates
///
/// The fixed 10 x 7.5 view is letterboxed into the surface so world units
/// stay square at any aspect ratio.
pub fn world_to_ndc(p: Vec2, size: (u32, u32)) -> Vec2 {
    let (w, h) = size;
    let view_aspect = VIEW_HALF_WIDTH / VIEW_HALF_HEIGHT;
    let aspect = if h == 0 { view_aspect } else { w as f32 / h as f32 };
    let ndc = Vec2::new(p.x / VIEW_HALF_WIDTH, p.y / VIEW_HALF_HEIGHT);

    if aspect > view_aspect {
        // Wider than the view: pillarbox
        Vec2::new(ndc.x * view_aspect / aspect, ndc.y)
    } else {
        // Taller than the view: letterbox
        Vec2::new(ndc.x, ndc.y * aspect / view_aspect)
    }
}
