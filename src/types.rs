// Core pixel types shared by the camera, compositor and window.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A frame filled with one packed color.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: u32) {
        self.pixels[y * self.width + x] = color;
    }
}

/// Axis-aligned rectangle in screen pixels. `x`/`y` may be negative
/// (an object hanging off the left/top edge); `w`/`h` are never negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 { self.x + self.w }
    pub fn bottom(&self) -> i32 { self.y + self.h }
    pub fn is_empty(&self) -> bool { self.w <= 0 || self.h <= 0 }

    /// Overlap with `[0,width) x [0,height)`; empty when fully outside.
    pub fn clip_to(&self, width: usize, height: usize) -> Rect {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = self.right().min(width as i32);
        let y2 = self.bottom().min(height as i32);
        Rect::new(x1, y1, (x2 - x1).max(0), (y2 - y1).max(0))
    }
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub fn unpack_rgb(px: u32) -> [u8; 3] {
    [((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8]
}

/// BT.601 luma, rounded. Same weights a camera pipeline uses for RGB→gray.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_are_inverse() {
        let px = pack_rgb(12, 200, 7);
        assert_eq!(px, 0x000C_C807);
        assert_eq!(unpack_rgb(px), [12, 200, 7]);
    }

    #[test]
    fn luma_extremes() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(1, 1, 1), 1);
    }

    #[test]
    fn clip_handles_all_sides() {
        let r = Rect::new(-10, -5, 30, 20).clip_to(15, 10);
        assert_eq!(r, Rect::new(0, 0, 15, 10));
        let off = Rect::new(100, 100, 5, 5).clip_to(15, 10);
        assert!(off.is_empty());
    }
}
