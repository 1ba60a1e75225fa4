//! Sprite atlas packing: opaque cropping and a uniform grid layout.

use crate::constants::{ATLAS_CELL_MAX, ATLAS_MAX_SIZE};

const ALPHA_THRESHOLD: u8 = 8;

/// Normalized sub-rectangle of the atlas texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtlasRect {
    pub u0: f32,
    pub v0: f32,
    pub us: f32,
    pub vs: f32,
}

impl AtlasRect {
    pub const FULL: AtlasRect = AtlasRect {
        u0: 0.0,
        v0: 0.0,
        us: 1.0,
        vs: 1.0,
    };

    pub fn to_array(self) -> [f32; 4] {
        [self.u0, self.v0, self.us, self.vs]
    }
}

/// Pixel rectangle inside a source image or the atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Bounding box of pixels whose alpha exceeds a small threshold. Fully
/// transparent (or truncated) images keep their full extent.
pub fn opaque_bounds(rgba: &[u8], width: u32, height: u32) -> PixelRect {
    let full = PixelRect {
        x: 0,
        y: 0,
        w: width,
        h: height,
    };
    if rgba.len() < (width as usize) * (height as usize) * 4 {
        return full;
    }
    let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
    let (mut max_x, mut max_y) = (0u32, 0u32);
    let mut any = false;
    for y in 0..height {
        let row = (y * width) as usize * 4;
        for x in 0..width {
            if rgba[row + x as usize * 4 + 3] <= ALPHA_THRESHOLD {
                continue;
            }
            any = true;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    if !any {
        return full;
    }
    PixelRect {
        x: min_x,
        y: min_y,
        w: max_x - min_x + 1,
        h: max_y - min_y + 1,
    }
}

/// Where each cropped sprite lands in the atlas.
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasLayout {
    pub width: u32,
    pub height: u32,
    pub cols: u32,
    pub rows: u32,
    pub placements: Vec<PixelRect>,
}

impl AtlasLayout {
    /// Lay out sprites with the given cropped sizes on a near-square grid of
    /// equal cells. Sprites are first capped to `ATLAS_CELL_MAX` on their
    /// longest edge, then the whole sheet is scaled to fit `ATLAS_MAX_SIZE`.
    pub fn compute(sizes: &[(u32, u32)]) -> Self {
        Self::compute_with_limits(sizes, ATLAS_CELL_MAX, ATLAS_MAX_SIZE)
    }

    pub fn compute_with_limits(sizes: &[(u32, u32)], cell_max: u32, max_size: u32) -> Self {
        let scaled: Vec<(f32, f32)> = sizes
            .iter()
            .map(|&(w, h)| {
                let longest = w.max(h).max(1) as f32;
                let scale = (cell_max as f32 / longest).min(1.0);
                (
                    (w as f32 * scale).round().max(1.0),
                    (h as f32 * scale).round().max(1.0),
                )
            })
            .collect();
        let count = scaled.len().max(1) as u32;
        let cell_w = scaled.iter().map(|s| s.0).fold(1.0, f32::max);
        let cell_h = scaled.iter().map(|s| s.1).fold(1.0, f32::max);
        let cols = (count as f32).sqrt().ceil() as u32;
        let rows = count.div_ceil(cols);

        let raw_w = cols as f32 * cell_w;
        let raw_h = rows as f32 * cell_h;
        let scale_down = (max_size as f32 / raw_w.max(raw_h)).min(1.0);
        let width = ((raw_w * scale_down).floor() as u32).max(1);
        let height = ((raw_h * scale_down).floor() as u32).max(1);
        let cw = (cell_w * scale_down).floor();
        let ch = (cell_h * scale_down).floor();

        let placements = scaled
            .iter()
            .enumerate()
            .map(|(i, &(sw, sh))| {
                let i = i as u32;
                let x0 = ((i % cols) as f32 * cell_w * scale_down).floor();
                let y0 = ((i / cols) as f32 * cell_h * scale_down).floor();
                let w = (sw * scale_down).floor().max(1.0);
                let h = (sh * scale_down).floor().max(1.0);
                PixelRect {
                    x: (x0 + ((cw - w) / 2.0).floor()).max(0.0) as u32,
                    y: (y0 + ((ch - h) / 2.0).floor()).max(0.0) as u32,
                    w: w as u32,
                    h: h as u32,
                }
            })
            .collect();

        Self {
            width,
            height,
            cols,
            rows,
            placements,
        }
    }

    pub fn rects(&self) -> Vec<AtlasRect> {
        let (w, h) = (self.width as f32, self.height as f32);
        self.placements
            .iter()
            .map(|p| AtlasRect {
                u0: p.x as f32 / w,
                v0: p.y as f32 / h,
                us: p.w as f32 / w,
                vs: p.h as f32 / h,
            })
            .collect()
    }
}
