//! The monochrome frame buffer.
use crate::definitions::display::{HEIGHT, WIDTH};

/// The 64 x 32 pixels of the screen, `true` means the pixel is lit.
///
/// The top left corner is `(0, 0)`, sprites are XORed onto the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    pixels: [[bool; WIDTH]; HEIGHT],
    /// Set by every clear and draw, until the frame driver rendered the buffer
    dirty: bool,
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBuffer {
    pub fn new() -> Self {
        Self {
            pixels: [[false; WIDTH]; HEIGHT],
            dirty: false,
        }
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.pixels = [[false; WIDTH]; HEIGHT];
        self.dirty = true;
    }

    /// XORs the sprite onto the buffer and returns `true` if any pixel was
    /// turned off by it.
    ///
    /// The origin wraps around the screen, the sprite itself is clipped at
    /// the right and bottom edges.
    ///
    /// # Example
    /// ```rust
    /// # use chip::display::DisplayBuffer;
    /// let mut display = DisplayBuffer::new();
    /// assert!(!display.draw_sprite(0, 0, &[0x80]));
    /// assert!(display.pixel(0, 0));
    /// assert!(display.draw_sprite(64, 32, &[0x80]));
    /// assert!(!display.pixel(0, 0));
    /// ```
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let x0 = x as usize % WIDTH;
        let y0 = y as usize % HEIGHT;
        let mut collision = false;

        for (row, byte) in sprite.iter().enumerate() {
            let py = y0 + row;
            if py >= HEIGHT {
                break;
            }
            for bit in 0..8 {
                let px = x0 + bit;
                if px >= WIDTH {
                    break;
                }
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let pixel = &mut self.pixels[py][px];
                collision |= *pixel;
                *pixel ^= true;
            }
        }

        self.dirty = true;
        collision
    }

    /// Returns the pixel at the given position, positions outside of
    /// the screen are never lit.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// The rows of the screen from top to bottom.
    pub fn rows(&self) -> &[[bool; WIDTH]; HEIGHT] {
        &self.pixels
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|row| row.iter().all(|&p| !p))
    }

    /// The amount of lit pixels.
    pub fn lit(&self) -> usize {
        self.pixels.iter().flatten().filter(|&&p| p).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank() {
        let display = DisplayBuffer::new();
        assert!(display.is_blank());
        assert!(!display.is_dirty());
    }

    #[test]
    fn test_draw_and_erase() {
        let mut display = DisplayBuffer::new();
        assert!(!display.draw_sprite(5, 5, &[0x12]));
        assert!(display.pixel(8, 5));
        assert!(display.pixel(11, 5));
        assert_eq!(display.lit(), 2);
        assert!(display.is_dirty());

        display.mark_clean();
        assert!(display.draw_sprite(5, 5, &[0x12]));
        assert!(display.is_blank());
        assert!(display.is_dirty());
    }

    #[test]
    fn test_collision_only_on_erase() {
        let mut display = DisplayBuffer::new();
        assert!(!display.draw_sprite(0, 0, &[0xF0]));
        // overlapping only on the pixels that are not erased
        assert!(!display.draw_sprite(4, 0, &[0xF0]));
        assert!(display.draw_sprite(3, 0, &[0x80]));
        assert!(!display.pixel(3, 0));
    }

    #[test]
    fn test_clip_right_and_bottom() {
        let mut display = DisplayBuffer::new();
        display.draw_sprite(60, 30, &[0xFF, 0xFF, 0xFF, 0xFF]);
        // 4 columns and 2 rows remain visible
        assert_eq!(display.lit(), 8);
        assert!(display.pixel(63, 31));
        assert!(!display.pixel(0, 0));
        assert!(!display.pixel(0, 30));
    }

    #[test]
    fn test_origin_wraps() {
        let mut display = DisplayBuffer::new();
        display.draw_sprite(70, 33, &[0x80]);
        assert!(display.pixel(6, 1));
        assert_eq!(display.lit(), 1);
    }

    #[test]
    fn test_clear() {
        let mut display = DisplayBuffer::new();
        display.draw_sprite(0, 0, &[0xFF]);
        display.mark_clean();
        display.clear();
        assert!(display.is_blank());
        assert!(display.is_dirty());
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let mut display = DisplayBuffer::new();
        display.draw_sprite(0, 0, &[0xFF]);
        assert!(!display.pixel(WIDTH, 0));
        assert!(!display.pixel(0, HEIGHT));
    }
}
