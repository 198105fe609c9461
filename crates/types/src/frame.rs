//! Engine framebuffer as seen by the host.
//!
//! The engine writes 32-bit ARGB words; the host keeps a decoded RGB copy
//! with alpha dropped (the engine never produces meaningful alpha). The
//! frame is overwritten in place every tick so the steady state allocates
//! nothing.

use crate::{DOOM_RES_X, DOOM_RES_Y};

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Decoded copy of the engine's fixed-size frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl RgbaFrame {
    /// All-black frame at the engine's native resolution.
    pub fn new() -> Self {
        Self {
            width: DOOM_RES_X,
            height: DOOM_RES_Y,
            pixels: vec![Rgb::default(); DOOM_RES_X * DOOM_RES_Y],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    /// Decode 0xAARRGGBB words in place. Extra source words are ignored;
    /// a short source leaves the tail of the frame untouched.
    pub fn fill_from_argb(&mut self, words: &[u32]) {
        for (dst, &w) in self.pixels.iter_mut().zip(words.iter()) {
            *dst = Rgb::new((w >> 16) as u8, (w >> 8) as u8, w as u8);
        }
    }

    /// Decode little-endian ARGB words from raw guest memory bytes.
    pub fn fill_from_argb_le_bytes(&mut self, bytes: &[u8]) {
        for (dst, src) in self.pixels.iter_mut().zip(bytes.chunks_exact(4)) {
            // Little-endian 0xAARRGGBB lays out as [B, G, R, A].
            *dst = Rgb::new(src[2], src[1], src[0]);
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgb::default());
    }
}

impl Default for RgbaFrame {
    fn default() -> Self {
        Self::new()
    }
}
