//! Glyph catalog
//!
//! Sixteen fixed 5x5 images. Each image is five rows; in every row bit 4 is
//! the leftmost pixel and bit 0 the rightmost, 1 = on.

/// Glyph width and height in pixels
pub const GLYPH_SIZE: usize = 5;

/// Number of glyphs in the catalog
pub const GLYPH_COUNT: usize = 16;

/// Image maps, indexed by [`Glyph`] discriminant
const IMAGE_MAPS: [[u8; GLYPH_SIZE]; GLYPH_COUNT] = [
    [0b01100, 0b10010, 0b10010, 0b10010, 0b01100], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b01110], // 1
    [0b11100, 0b00010, 0b01100, 0b10000, 0b11110], // 2
    [0b11110, 0b00010, 0b00100, 0b10010, 0b01100], // 3
    [0b00110, 0b01010, 0b10010, 0b11111, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b11110], // 5
    [0b00010, 0b00100, 0b01110, 0b10001, 0b01110], // 6
    [0b11111, 0b00010, 0b00100, 0b01000, 0b10000], // 7
    [0b01110, 0b10001, 0b01110, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b01110, 0b00100, 0b01000], // 9
    [0b01010, 0b01010, 0b00000, 0b10001, 0b01110], // Happy
    [0b01010, 0b01010, 0b00000, 0b01110, 0b10001], // Sad
    [0b01010, 0b00000, 0b00100, 0b01010, 0b00100], // Surprised
    [0b01100, 0b11100, 0b01111, 0b01110, 0b00000], // Duck
    [0b00000, 0b00001, 0b00010, 0b10100, 0b01000], // Check
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000], // Clear
];

/// Images the matrix can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Glyph {
    Zero = 0,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Happy,
    Sad,
    Surprised,
    Duck,
    Check,
    Clear,
}

impl Glyph {
    /// Every glyph in catalog order
    pub const ALL: [Glyph; GLYPH_COUNT] = [
        Glyph::Zero,
        Glyph::One,
        Glyph::Two,
        Glyph::Three,
        Glyph::Four,
        Glyph::Five,
        Glyph::Six,
        Glyph::Seven,
        Glyph::Eight,
        Glyph::Nine,
        Glyph::Happy,
        Glyph::Sad,
        Glyph::Surprised,
        Glyph::Duck,
        Glyph::Check,
        Glyph::Clear,
    ];

    /// Look up a glyph by catalog index (0-15)
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Glyph for a decimal digit (0-9)
    pub fn digit(value: u8) -> Option<Self> {
        if value < 10 {
            Self::from_index(value)
        } else {
            None
        }
    }

    /// Catalog index
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Row bitmasks for this glyph
    pub fn bitmap(self) -> [u8; GLYPH_SIZE] {
        IMAGE_MAPS[self as usize]
    }

    /// Whether the pixel at (`row`, `bit`) is on; out-of-range is off
    pub fn is_set(self, row: usize, bit: usize) -> bool {
        bit < GLYPH_SIZE
            && self
                .bitmap()
                .get(row)
                .is_some_and(|mask| mask & (1 << bit) != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (i, glyph) in Glyph::ALL.iter().enumerate() {
            assert_eq!(glyph.index() as usize, i);
            assert_eq!(Glyph::from_index(i as u8), Some(*glyph));
        }
        assert_eq!(Glyph::from_index(16), None);
    }

    #[test]
    fn test_digits() {
        assert_eq!(Glyph::digit(0), Some(Glyph::Zero));
        assert_eq!(Glyph::digit(9), Some(Glyph::Nine));
        assert_eq!(Glyph::digit(10), None);
    }

    #[test]
    fn test_rows_fit_five_bits() {
        for glyph in Glyph::ALL {
            assert!(glyph.bitmap().iter().all(|row| *row < 0b100000));
        }
    }

    #[test]
    fn test_clear_is_blank() {
        assert_eq!(Glyph::Clear.bitmap(), [0; GLYPH_SIZE]);
        assert!(Glyph::ALL[..15].iter().all(|g| g.bitmap() != [0; GLYPH_SIZE]));
    }

    #[test]
    fn test_is_set() {
        // Bottom row of FOUR is 00010: only bit 1
        assert!(Glyph::Four.is_set(4, 1));
        assert!(!Glyph::Four.is_set(4, 0));
        assert!(!Glyph::Four.is_set(5, 1));
        assert!(!Glyph::Four.is_set(0, 5));
    }
}
