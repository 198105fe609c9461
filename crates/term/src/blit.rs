//! Pixel-to-cell blitter.
//!
//! Maps the engine's fixed 1280x800 frame onto an arbitrary cols x rows
//! grid. Every destination cell packs two vertically stacked source pixels:
//! the top one as foreground, the bottom one as background, rendered with
//! the upper-half-block glyph. Sampling is nearest-neighbor with no state
//! carried between calls, so the blit is deterministic and a resize simply
//! changes the scale factors on the next frame.
//!
//! This runs over every cell once per tick and is the dominant per-frame
//! cost; it allocates nothing.

use tui_doom_types::RgbaFrame;

use crate::fb::{Cell, FrameBuffer};

/// Upper half block: foreground paints the top half of the cell.
pub const HALF_BLOCK: char = '\u{2580}';

/// Rasterize `frame` into `fb` at the grid's current size.
///
/// A zero-size grid (terminal not yet sized) skips the blit entirely.
pub fn blit(frame: &RgbaFrame, fb: &mut FrameBuffer) {
    let cols = fb.width() as usize;
    let rows = fb.height() as usize;
    if cols == 0 || rows == 0 {
        return;
    }

    let src_w = frame.width();
    let src_h = frame.height();
    let scale_x = src_w as f64 / cols as f64;
    let scale_y = src_h as f64 / (2.0 * rows as f64);

    for y in 0..rows {
        let src_y1 = (((2 * y) as f64 * scale_y) as usize).min(src_h - 1);
        let src_y2 = (((2 * y + 1) as f64 * scale_y) as usize).min(src_h - 1);
        for x in 0..cols {
            let src_x = ((x as f64 * scale_x) as usize).min(src_w - 1);
            fb.set(
                x as u16,
                y as u16,
                Cell {
                    ch: HALF_BLOCK,
                    fg: frame.pixel(src_x, src_y1),
                    bg: frame.pixel(src_x, src_y2),
                },
            );
        }
    }
}
