//! Display configuration types

use heapless::Vec;

use crate::glyph::GLYPH_SIZE;

/// Maximum channels per pixel (RGBW)
pub const MAX_CHANNELS: usize = 4;

/// Default channel level for a fresh device
pub const DEFAULT_LEVEL: u8 = 127;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Document is not valid JSON
    Malformed,
    /// Document is valid JSON but not an object
    NotAnObject,
    /// The `color` field is not a string
    InvalidColor,
    /// Color has a channel count other than 3 or 4
    ChannelCount(usize),
    /// Matrix geometry the glyph layout cannot fill
    Geometry { rows: u8, columns: u8 },
    /// The base device refused its part of the document
    Rejected,
}

/// Pixel color, 3 (RGB) or 4 (RGBW) channels
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color {
    channels: Vec<u8, MAX_CHANNELS>,
}

impl Color {
    /// Create a color from 3 or 4 channel values
    pub fn new(channels: &[u8]) -> Result<Self, ConfigError> {
        match channels.len() {
            3 | 4 => Ok(Self {
                channels: Vec::from_slice(channels)
                    .map_err(|_| ConfigError::ChannelCount(channels.len()))?,
            }),
            n => Err(ConfigError::ChannelCount(n)),
        }
    }

    /// Create an RGB color
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        let mut channels = Vec::new();
        // Capacity is four; three always fit
        let _ = channels.extend_from_slice(&[r, g, b]);
        Self { channels }
    }

    /// Create an RGBW color
    pub fn rgbw(r: u8, g: u8, b: u8, w: u8) -> Self {
        let mut channels = Vec::new();
        let _ = channels.extend_from_slice(&[r, g, b, w]);
        Self { channels }
    }

    /// Channel values in order
    pub fn channels(&self) -> &[u8] {
        &self.channels
    }

    /// Number of channels (3 or 4)
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(DEFAULT_LEVEL, DEFAULT_LEVEL, DEFAULT_LEVEL)
    }
}

/// Active display configuration
///
/// Rows and columns are fixed for the lifetime of the device; only the
/// color changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Color used for lit pixels
    pub color: Color,
    rows: u8,
    columns: u8,
}

impl DisplayConfig {
    /// Create a configuration for a `rows` x `columns` matrix
    ///
    /// The matrix must be square and no larger than a glyph, since the
    /// wiring transform strides rows by the row count.
    pub fn new(rows: u8, columns: u8) -> Result<Self, ConfigError> {
        if rows == 0 || rows != columns || usize::from(rows) > GLYPH_SIZE {
            return Err(ConfigError::Geometry { rows, columns });
        }
        Ok(Self {
            color: Color::default(),
            rows,
            columns,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of columns
    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        usize::from(self.rows) * usize::from(self.columns)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: Color::default(),
            rows: GLYPH_SIZE as u8,
            columns: GLYPH_SIZE as u8,
        }
    }
}
