//! # Software Drawing Surface
//!
//! A headless RGB8 canvas with the primitives the renderer needs: filled
//! rectangles, lines, dots, and text from an embedded 5x7 bitmap font.
//! The canvas can be exported to PNG, and carries a thread-safe close
//! request so a windowing backend (or a test) can ask the render loop to
//! shut down through the normal event path.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Character cell: 5+1 px wide, 7+2 px tall.
pub const CHAR_W: u32 = 6;
pub const CHAR_H: u32 = 9;

/// Largest accepted canvas dimension on either axis.
pub const MAX_DIM: u32 = 8192;

/// Each glyph: 7 rows, each row's lower 5 bits = pixels (MSB=left).
#[rustfmt::skip]
const FONT_5X7: [[u8; 7]; 95] = [
    [0x00,0x00,0x00,0x00,0x00,0x00,0x00], // 32 ' '
    [0x04,0x04,0x04,0x04,0x04,0x00,0x04], // 33 '!'
    [0x0A,0x0A,0x0A,0x00,0x00,0x00,0x00], // 34 '"'
    [0x0A,0x0A,0x1F,0x0A,0x1F,0x0A,0x0A], // 35 '#'
    [0x04,0x0F,0x14,0x0E,0x05,0x1E,0x04], // 36 '$'
    [0x18,0x19,0x02,0x04,0x08,0x13,0x03], // 37 '%'
    [0x0C,0x12,0x14,0x08,0x15,0x12,0x0D], // 38 '&'
    [0x04,0x04,0x08,0x00,0x00,0x00,0x00], // 39 '''
    [0x02,0x04,0x08,0x08,0x08,0x04,0x02], // 40 '('
    [0x08,0x04,0x02,0x02,0x02,0x04,0x08], // 41 ')'
    [0x00,0x04,0x15,0x0E,0x15,0x04,0x00], // 42 '*'
    [0x00,0x04,0x04,0x1F,0x04,0x04,0x00], // 43 '+'
    [0x00,0x00,0x00,0x00,0x00,0x04,0x08], // 44 ','
    [0x00,0x00,0x00,0x1F,0x00,0x00,0x00], // 45 '-'
    [0x00,0x00,0x00,0x00,0x00,0x00,0x04], // 46 '.'
    [0x00,0x01,0x02,0x04,0x08,0x10,0x00], // 47 '/'
    [0x0E,0x11,0x13,0x15,0x19,0x11,0x0E], // 48 '0'
    [0x04,0x0C,0x04,0x04,0x04,0x04,0x0E], // 49 '1'
    [0x0E,0x11,0x01,0x02,0x04,0x08,0x1F], // 50 '2'
    [0x1F,0x02,0x04,0x02,0x01,0x11,0x0E], // 51 '3'
    [0x02,0x06,0x0A,0x12,0x1F,0x02,0x02], // 52 '4'
    [0x1F,0x10,0x1E,0x01,0x01,0x11,0x0E], // 53 '5'
    [0x06,0x08,0x10,0x1E,0x11,0x11,0x0E], // 54 '6'
    [0x1F,0x01,0x02,0x04,0x08,0x08,0x08], // 55 '7'
    [0x0E,0x11,0x11,0x0E,0x11,0x11,0x0E], // 56 '8'
    [0x0E,0x11,0x11,0x0F,0x01,0x02,0x0C], // 57 '9'
    [0x00,0x00,0x04,0x00,0x00,0x04,0x00], // 58 ':'
    [0x00,0x00,0x04,0x00,0x00,0x04,0x08], // 59 ';'
    [0x02,0x04,0x08,0x10,0x08,0x04,0x02], // 60 '<'
    [0x00,0x00,0x1F,0x00,0x1F,0x00,0x00], // 61 '='
    [0x08,0x04,0x02,0x01,0x02,0x04,0x08], // 62 '>'
    [0x0E,0x11,0x01,0x02,0x04,0x00,0x04], // 63 '?'
    [0x0E,0x11,0x17,0x15,0x17,0x10,0x0E], // 64 '@'
    [0x0E,0x11,0x11,0x1F,0x11,0x11,0x11], // 65 'A'
    [0x1E,0x11,0x11,0x1E,0x11,0x11,0x1E], // 66 'B'
    [0x0E,0x11,0x10,0x10,0x10,0x11,0x0E], // 67 'C'
    [0x1C,0x12,0x11,0x11,0x11,0x12,0x1C], // 68 'D'
    [0x1F,0x10,0x10,0x1E,0x10,0x10,0x1F], // 69 'E'
    [0x1F,0x10,0x10,0x1E,0x10,0x10,0x10], // 70 'F'
    [0x0E,0x11,0x10,0x17,0x11,0x11,0x0F], // 71 'G'
    [0x11,0x11,0x11,0x1F,0x11,0x11,0x11], // 72 'H'
    [0x0E,0x04,0x04,0x04,0x04,0x04,0x0E], // 73 'I'
    [0x07,0x02,0x02,0x02,0x02,0x12,0x0C], // 74 'J'
    [0x11,0x12,0x14,0x18,0x14,0x12,0x11], // 75 'K'
    [0x10,0x10,0x10,0x10,0x10,0x10,0x1F], // 76 'L'
    [0x11,0x1B,0x15,0x15,0x11,0x11,0x11], // 77 'M'
    [0x11,0x11,0x19,0x15,0x13,0x11,0x11], // 78 'N'
    [0x0E,0x11,0x11,0x11,0x11,0x11,0x0E], // 79 'O'
    [0x1E,0x11,0x11,0x1E,0x10,0x10,0x10], // 80 'P'
    [0x0E,0x11,0x11,0x11,0x15,0x12,0x0D], // 81 'Q'
    [0x1E,0x11,0x11,0x1E,0x14,0x12,0x11], // 82 'R'
    [0x0F,0x10,0x10,0x0E,0x01,0x01,0x1E], // 83 'S'
    [0x1F,0x04,0x04,0x04,0x04,0x04,0x04], // 84 'T'
    [0x11,0x11,0x11,0x11,0x11,0x11,0x0E], // 85 'U'
    [0x11,0x11,0x11,0x11,0x11,0x0A,0x04], // 86 'V'
    [0x11,0x11,0x11,0x15,0x15,0x1B,0x11], // 87 'W'
    [0x11,0x11,0x0A,0x04,0x0A,0x11,0x11], // 88 'X'
    [0x11,0x11,0x0A,0x04,0x04,0x04,0x04], // 89 'Y'
    [0x1F,0x01,0x02,0x04,0x08,0x10,0x1F], // 90 'Z'
    [0x0E,0x08,0x08,0x08,0x08,0x08,0x0E], // 91 '['
    [0x00,0x10,0x08,0x04,0x02,0x01,0x00], // 92 '\'
    [0x0E,0x02,0x02,0x02,0x02,0x02,0x0E], // 93 ']'
    [0x04,0x0A,0x11,0x00,0x00,0x00,0x00], // 94 '^'
    [0x00,0x00,0x00,0x00,0x00,0x00,0x1F], // 95 '_'
    [0x08,0x04,0x02,0x00,0x00,0x00,0x00], // 96 '`'
    [0x00,0x00,0x0E,0x01,0x0F,0x11,0x0F], // 97 'a'
    [0x10,0x10,0x16,0x19,0x11,0x11,0x1E], // 98 'b'
    [0x00,0x00,0x0E,0x10,0x10,0x11,0x0E], // 99 'c'
    [0x01,0x01,0x0D,0x13,0x11,0x11,0x0F], // 100 'd'
    [0x00,0x00,0x0E,0x11,0x1F,0x10,0x0E], // 101 'e'
    [0x06,0x09,0x08,0x1C,0x08,0x08,0x08], // 102 'f'
    [0x00,0x00,0x0F,0x11,0x0F,0x01,0x0E], // 103 'g'
    [0x10,0x10,0x16,0x19,0x11,0x11,0x11], // 104 'h'
    [0x04,0x00,0x0C,0x04,0x04,0x04,0x0E], // 105 'i'
    [0x02,0x00,0x06,0x02,0x02,0x12,0x0C], // 106 'j'
    [0x10,0x10,0x12,0x14,0x18,0x14,0x12], // 107 'k'
    [0x0C,0x04,0x04,0x04,0x04,0x04,0x0E], // 108 'l'
    [0x00,0x00,0x1A,0x15,0x15,0x11,0x11], // 109 'm'
    [0x00,0x00,0x16,0x19,0x11,0x11,0x11], // 110 'n'
    [0x00,0x00,0x0E,0x11,0x11,0x11,0x0E], // 111 'o'
    [0x00,0x00,0x1E,0x11,0x1E,0x10,0x10], // 112 'p'
    [0x00,0x00,0x0D,0x13,0x0F,0x01,0x01], // 113 'q'
    [0x00,0x00,0x16,0x19,0x10,0x10,0x10], // 114 'r'
    [0x00,0x00,0x0E,0x10,0x0E,0x01,0x1E], // 115 's'
    [0x08,0x08,0x1C,0x08,0x08,0x09,0x06], // 116 't'
    [0x00,0x00,0x11,0x11,0x11,0x13,0x0D], // 117 'u'
    [0x00,0x00,0x11,0x11,0x11,0x0A,0x04], // 118 'v'
    [0x00,0x00,0x11,0x11,0x15,0x15,0x0A], // 119 'w'
    [0x00,0x00,0x11,0x0A,0x04,0x0A,0x11], // 120 'x'
    [0x00,0x00,0x11,0x11,0x0F,0x01,0x0E], // 121 'y'
    [0x00,0x00,0x1F,0x02,0x04,0x08,0x1F], // 122 'z'
    [0x02,0x04,0x04,0x08,0x04,0x04,0x02], // 123 '{'
    [0x04,0x04,0x04,0x04,0x04,0x04,0x04], // 124 '|'
    [0x08,0x04,0x04,0x02,0x04,0x04,0x08], // 125 '}'
    [0x00,0x00,0x08,0x15,0x02,0x00,0x00], // 126 '~'
];

/// Errors from surface creation or export.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("image export failed: {0}")]
    Export(#[from] image::ImageError),
}

/// Events reported by the surface, drained once per render-loop tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The surface was asked to close; treated like a quit command.
    CloseRequested,
}

/// Handle that lets any thread request the surface to close.
#[derive(Clone)]
pub struct CloseHandle(Arc<AtomicBool>);

impl CloseHandle {
    pub fn request_close(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Headless RGB8 pixel buffer with basic drawing primitives.
pub struct Canvas {
    width: u32,
    height: u32,
    buf: Vec<u8>,
    close_requested: Arc<AtomicBool>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
            return Err(SurfaceError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            buf: vec![0u8; (width * height * 3) as usize],
            close_requested: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle(self.close_requested.clone())
    }

    /// Drains pending surface events.
    pub fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        if self.close_requested.swap(false, Ordering::SeqCst) {
            vec![SurfaceEvent::CloseRequested]
        } else {
            Vec::new()
        }
    }

    pub fn clear(&mut self, color: [u8; 3]) {
        for chunk in self.buf.chunks_exact_mut(3) {
            chunk.copy_from_slice(&color);
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            let idx = ((y as u32 * self.width + x as u32) * 3) as usize;
            self.buf[idx..idx + 3].copy_from_slice(&color);
        }
    }

    /// Pixel value, for tests. Out-of-bounds reads black.
    pub fn pixel(&self, x: i32, y: i32) -> [u8; 3] {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            let idx = ((y as u32 * self.width + x as u32) * 3) as usize;
            [self.buf[idx], self.buf[idx + 1], self.buf[idx + 2]]
        } else {
            [0, 0, 0]
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: [u8; 3]) {
        for dy in 0..h as i32 {
            for dx in 0..w as i32 {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// Bresenham line, roughly two pixels thick.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: [u8; 3]) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let steep = dy.abs() > dx;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.set_pixel(x, y, color);
            if steep {
                self.set_pixel(x + 1, y, color);
            } else {
                self.set_pixel(x, y + 1, color);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn draw_dot(&mut self, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    pub fn draw_char(&mut self, x: i32, y: i32, ch: char, color: [u8; 3]) {
        let code = ch as u32;
        if !(32..=126).contains(&code) {
            return;
        }
        let glyph = &FONT_5X7[(code - 32) as usize];
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..5i32 {
                if bits & (0x10 >> col) != 0 {
                    self.set_pixel(x + col, y + row as i32, color);
                }
            }
        }
    }

    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: [u8; 3]) {
        for (i, ch) in text.chars().enumerate() {
            self.draw_char(x + i as i32 * CHAR_W as i32, y, ch, color);
        }
    }

    /// Pixel width of `text` in this font.
    pub fn text_width(text: &str) -> u32 {
        text.chars().count() as u32 * CHAR_W
    }

    /// Saves the buffer as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), SurfaceError> {
        image::save_buffer(
            path,
            &self.buf,
            self.width,
            self.height,
            image::ExtendedColorType::Rgb8,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_sizes() {
        assert!(Canvas::new(0, 100).is_err());
        assert!(Canvas::new(100, 0).is_err());
        assert!(Canvas::new(MAX_DIM + 1, 100).is_err());
        assert!(Canvas::new(16, 16).is_ok());
    }

    #[test]
    fn pixels_clip_at_bounds() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.set_pixel(-1, 0, [255, 0, 0]);
        canvas.set_pixel(4, 4, [255, 0, 0]);
        canvas.set_pixel(2, 2, [255, 0, 0]);
        assert_eq!(canvas.pixel(2, 2), [255, 0, 0]);
        assert_eq!(canvas.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut canvas = Canvas::new(3, 2).unwrap();
        canvas.clear([10, 20, 30]);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(canvas.pixel(x, y), [10, 20, 30]);
            }
        }
    }

    #[test]
    fn line_endpoints_are_painted() {
        let mut canvas = Canvas::new(32, 32).unwrap();
        canvas.draw_line(2, 3, 20, 17, [1, 2, 3]);
        assert_eq!(canvas.pixel(2, 3), [1, 2, 3]);
        assert_eq!(canvas.pixel(20, 17), [1, 2, 3]);
    }

    #[test]
    fn close_request_surfaces_once() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        assert!(canvas.poll_events().is_empty());
        canvas.close_handle().request_close();
        assert_eq!(canvas.poll_events(), vec![SurfaceEvent::CloseRequested]);
        assert!(canvas.poll_events().is_empty());
    }

    #[test]
    fn text_renders_some_ink() {
        let mut canvas = Canvas::new(64, 16).unwrap();
        canvas.draw_text(1, 1, "Turn 4", [255, 255, 255]);
        let mut lit = 0;
        for y in 0..16 {
            for x in 0..64 {
                if canvas.pixel(x, y) != [0, 0, 0] {
                    lit += 1;
                }
            }
        }
        assert!(lit > 20);
    }
}
