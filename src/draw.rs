// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the live camera image with the sprites on top.
// 2) Lines, rectangles and dots for the floor, capture box and selection marker.
// 3) A tiny 5x7 bitmap font to render HUD text on top of the video.

use crate::error::Error;
use crate::hands::PointerInput;
use crate::session::Command;
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

const SELECT_KEYS: [Key; 9] = [
    Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5,
    Key::Key6, Key::Key7, Key::Key8, Key::Key9,
];

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image (live video).
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Process window events without a new image (used when the camera missed a frame).
    pub fn pump(&mut self) {
        self.window.update();
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Key presses since the last frame, as session commands.
    /// Number keys select by ordinal; only the first `max_objects` are live.
    pub fn poll_commands(&self, max_objects: usize) -> Vec<Command> {
        let mut out = Vec::new();
        let pressed = |k| self.window.is_key_pressed(k, KeyRepeat::No);

        if pressed(Key::Q) || pressed(Key::Escape) {
            out.push(Command::Quit);
        }
        if pressed(Key::C) {
            out.push(Command::Capture);
        }
        if pressed(Key::R) {
            out.push(Command::Reset);
        }
        for (i, key) in SELECT_KEYS.iter().take(max_objects).enumerate() {
            if pressed(*key) {
                out.push(Command::Select(i));
            }
        }
        out
    }

    /// Mouse + tilt/peace keys for the simulated hand tracker.
    pub fn pointer_input(&self) -> PointerInput {
        PointerInput {
            cursor: self.window.get_mouse_pos(MouseMode::Clamp),
            left_button: self.window.get_mouse_down(MouseButton::Left),
            right_button: self.window.get_mouse_down(MouseButton::Right),
            scroll: self.window.get_scroll_wheel().map(|(_, dy)| dy).unwrap_or(0.0),
            tilt_ccw: self.window.is_key_down(Key::A),
            tilt_cw: self.window.is_key_down(Key::D),
            peace: self.window.is_key_down(Key::P),
        }
    }
}

/* ---------- Software drawing: pixels, lines, boxes, dots, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
/// Visual: the exact pixel at (x,y) changes color.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
/// Visual: a straight 1-pixel line appears on top of the camera image.
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Horizontal line `thickness` pixels tall starting at row `y`.
/// Visual: the gray floor line the sprites land on.
pub fn draw_hline(fb: &mut FrameBuffer, y: i32, thickness: i32, color: u32) {
    for t in 0..thickness {
        draw_line(fb, 0, y + t, fb.width as i32 - 1, y + t, color);
    }
}

/// Rectangle outline, `thickness` pixels drawn inwards.
/// Visual: the green capture box.
pub fn draw_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, thickness: i32, color: u32) {
    for t in 0..thickness {
        let (x0, y0, x1, y1) = (x + t, y + t, x + w - 1 - t, y + h - 1 - t);
        if x0 > x1 || y0 > y1 { break; }
        draw_line(fb, x0, y0, x1, y0, color);
        draw_line(fb, x0, y1, x1, y1, color);
        draw_line(fb, x0, y0, x0, y1, color);
        draw_line(fb, x1, y0, x1, y1, color);
    }
}

/// Solid disc centered at (cx,cy).
/// Visual: the yellow dot above the selected sprite.
pub fn fill_circle(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, color: u32) {
    let r2 = radius * radius;
    for y in -radius..=radius {
        for x in -radius..=radius {
            if x * x + y * y <= r2 {
                put_pixel(fb, cx + x, cy + y, color);
            }
        }
    }
}

/* ---------- 5x7 bitmap font (uppercase, digits, HUD punctuation) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Letters (lowercase input is drawn uppercase)
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Punctuation used by the HUD
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '&' => g!(0b01100,0b10010,0b10100,0b01000,0b10101,0b10010,0b01101),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), each font pixel `scale`×`scale`.
/// Visual: a glyph appears with a 1-cell black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    let Some(rows) = glyph5x7(ch) else { return };
    let mut cell = |px: i32, py: i32, c: u32| {
        for dy in 0..scale {
            for dx in 0..scale {
                put_pixel(fb, px + dx, py + dy, c);
            }
        }
    };

    // Shadow pass first, then the glyph on top of it
    for (offset, c) in [(scale, 0x00000000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    cell(x + rx * scale + offset, y + ry as i32 * scale + offset, c);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs.
/// Visual: a compact HUD string appears; each glyph is 5x7 with 1-pixel spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale);
        x += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
    }
}

/// Width in pixels `draw_text_5x7` will use for `text`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 6 * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_clips_at_edges() {
        let mut fb = FrameBuffer::filled(20, 10, 0);
        draw_line(&mut fb, -5, -5, 30, 30, 0x00FF_0000);
        draw_rect(&mut fb, -3, -3, 40, 40, 2, 0x0000_FF00);
        fill_circle(&mut fb, 19, 9, 8, 0x0000_00FF);
        draw_text_5x7(&mut fb, 15, 5, "OFF EDGE", 0x00FF_FFFF, 2);
        assert_eq!(fb.pixels.len(), 200);
    }

    #[test]
    fn rect_outline_leaves_inside_untouched() {
        let mut fb = FrameBuffer::filled(20, 20, 0);
        draw_rect(&mut fb, 2, 2, 10, 10, 2, 1);
        assert_eq!(fb.get(2, 2), 1);
        assert_eq!(fb.get(3, 3), 1);
        assert_eq!(fb.get(11, 11), 1);
        assert_eq!(fb.get(6, 6), 0);
    }

    #[test]
    fn every_hud_character_has_a_glyph() {
        let hud = "Selected: 1/5 | Scale: 1.0x RIGHT: Move+Rotate & 'c' (q) quit!";
        assert!(hud.chars().all(|c| glyph5x7(c).is_some()), "missing glyph in {hud}");
        assert_eq!(text_width("ABC", 2), 36);
    }
}
