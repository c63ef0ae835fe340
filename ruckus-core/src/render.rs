//! Glyph renderer
//!
//! Turns a glyph bitmap into the linear pixel buffer the strip expects.
//! The strip is wired so each row runs right to left relative to the
//! bitmap, which the index transform undoes.

use heapless::Vec;

use crate::config::{Color, DisplayConfig, MAX_CHANNELS};
use crate::glyph::{Glyph, GLYPH_SIZE};

/// Maximum pixels on a matrix
pub const MAX_PIXELS: usize = GLYPH_SIZE * GLYPH_SIZE;

/// Maximum bytes in a pixel buffer
pub const MAX_BUFFER_BYTES: usize = MAX_PIXELS * MAX_CHANNELS;

/// Rendered frame, `channels` bytes per pixel in strip order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelBuffer {
    channels: u8,
    data: Vec<u8, MAX_BUFFER_BYTES>,
}

impl PixelBuffer {
    /// Every pixel set to `color`, capped at [`MAX_PIXELS`]
    pub fn filled(color: &Color, count: usize) -> Self {
        let mut data = Vec::new();
        for _ in 0..count.min(MAX_PIXELS) {
            let _ = data.extend_from_slice(color.channels());
        }
        Self {
            channels: color.channel_count() as u8,
            data,
        }
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.data.len() / usize::from(self.channels)
        }
    }

    /// Whether the buffer holds no pixels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Channels per pixel (3 or 4)
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Channel values of pixel `index`
    pub fn pixel(&self, index: usize) -> Option<&[u8]> {
        let width = usize::from(self.channels);
        let start = index.checked_mul(width)?;
        self.data.get(start..start.checked_add(width)?)
    }

    /// Copy with every channel scaled by `level` (255 = unchanged)
    pub fn scaled(&self, level: u8) -> Self {
        let level = u16::from(level) + 1;
        Self {
            channels: self.channels,
            data: self
                .data
                .iter()
                .map(|c| ((u16::from(*c) * level) >> 8) as u8)
                .collect(),
        }
    }

    /// Raw channel bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Iterate over pixels in strip order
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks(usize::from(self.channels).max(1))
    }
}

/// Strip index of bitmap position (`row`, `bit`)
pub fn strip_index(row: usize, bit: usize, rows: usize, columns: usize) -> usize {
    row * rows + columns - (bit + 1)
}

/// Render `glyph` with the configured color and geometry
///
/// Lit pixels carry the configured color, unlit pixels are all zero.
pub fn render(glyph: Glyph, config: &DisplayConfig) -> PixelBuffer {
    let rows = usize::from(config.rows());
    let columns = usize::from(config.columns());
    let color = config.color.channels();
    let width = color.len();

    let mut data = Vec::new();
    // Geometry is bounded by MAX_PIXELS and color by MAX_CHANNELS
    let _ = data.resize(rows * columns * width, 0);

    for row in 0..rows {
        for bit in 0..columns {
            if glyph.is_set(row, bit) {
                let start = strip_index(row, bit, rows, columns) * width;
                if let Some(slot) = data.get_mut(start..start + width) {
                    slot.copy_from_slice(color);
                }
            }
        }
    }

    PixelBuffer {
        channels: width as u8,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config_with(color: Color) -> DisplayConfig {
        let mut config = DisplayConfig::default();
        config.color = color;
        config
    }

    #[test]
    fn test_clear_is_dark() {
        let buffer = render(Glyph::Clear, &DisplayConfig::default());
        assert_eq!(buffer.len(), 25);
        assert!(buffer.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_one_first_row() {
        // Row 0 of ONE is 00100: bit 2 only, strip index 0*5 + 5 - 3 = 2
        let color = Color::rgb(9, 8, 7);
        let buffer = render(Glyph::One, &config_with(color));
        assert_eq!(buffer.pixel(2), Some(&[9, 8, 7][..]));
        for i in [0, 1, 3, 4] {
            assert_eq!(buffer.pixel(i), Some(&[0, 0, 0][..]));
        }
    }

    #[test]
    fn test_check_last_row_rgbw() {
        // Row 4 of CHECK is 01000: bit 3, strip index 20 + 5 - 4 = 21
        let buffer = render(Glyph::Check, &config_with(Color::rgbw(1, 2, 3, 4)));
        assert_eq!(buffer.channels(), 4);
        assert_eq!(buffer.as_bytes().len(), 100);
        assert_eq!(buffer.pixel(21), Some(&[1, 2, 3, 4][..]));
        assert_eq!(buffer.pixel(20), Some(&[0, 0, 0, 0][..]));
        assert_eq!(buffer.pixel(25), None);
    }

    #[test]
    fn test_pixel_out_of_range() {
        let buffer = PixelBuffer::filled(&Color::rgb(1, 2, 3), 4);
        assert_eq!(buffer.pixel(3), Some(&[1, 2, 3][..]));
        assert_eq!(buffer.pixel(4), None);
        assert_eq!(buffer.pixel(usize::MAX / 3), None);
        assert_eq!(buffer.pixel(usize::MAX), None);
    }

    #[test]
    fn test_filled() {
        let buffer = PixelBuffer::filled(&Color::rgbw(1, 2, 3, 4), 30);
        assert_eq!(buffer.len(), MAX_PIXELS);
        assert!(buffer.iter().all(|px| px == [1, 2, 3, 4]));
    }

    #[test]
    fn test_scaled() {
        let buffer = PixelBuffer::filled(&Color::rgb(255, 128, 0), 2);
        assert_eq!(buffer.scaled(255), buffer);
        assert!(buffer.scaled(127).iter().all(|px| px == [127, 64, 0]));
        assert!(buffer.scaled(0).as_bytes().iter().all(|c| *c == 0));
    }

    #[test]
    fn test_small_matrix_uses_low_bits() {
        let mut config = DisplayConfig::new(3, 3).unwrap();
        config.color = Color::rgb(5, 5, 5);
        let buffer = render(Glyph::Four, &config);
        assert_eq!(buffer.len(), 9);
        // Row 0 of FOUR is 00110: bits 1 and 2 -> indices 1 and 0
        let lit: std::vec::Vec<usize> = buffer
            .iter()
            .enumerate()
            .filter(|(_, px)| px.iter().any(|c| *c != 0))
            .map(|(i, _)| i)
            .collect();
        // Row 1 is 01010 -> bit 1 -> 3 + 1 = 4; row 2 is 10010 -> bit 1 -> 7
        assert_eq!(lit, [0, 1, 4, 7]);
    }

    proptest! {
        #[test]
        fn test_render_matches_bitmap(
            index in 0u8..16,
            channels in proptest::collection::vec(1u8..=255, 3..=4),
        ) {
            let glyph = Glyph::from_index(index).unwrap();
            let color = Color::new(&channels).unwrap();
            let buffer = render(glyph, &config_with(color));

            prop_assert_eq!(buffer.len(), 25);
            prop_assert_eq!(usize::from(buffer.channels()), channels.len());

            for row in 0..GLYPH_SIZE {
                for bit in 0..GLYPH_SIZE {
                    let px = buffer.pixel(strip_index(row, bit, 5, 5)).unwrap();
                    if glyph.is_set(row, bit) {
                        prop_assert_eq!(px, &channels[..]);
                    } else {
                        prop_assert!(px.iter().all(|c| *c == 0));
                    }
                }
            }
        }
    }
}
