//! Pixel output trait

use crate::render::PixelBuffer;

/// Errors that can occur writing pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelError {
    /// Buffer has more pixels than the strip
    TooManyPixels,
    /// Channel count the strip cannot take
    UnsupportedChannels(u8),
    /// Output hardware failed
    Hardware,
}

/// Trait for pixel strip output
///
/// Implementations push a finished buffer to the LEDs. Writes are
/// synchronous and short.
pub trait PixelSink {
    /// Push `buffer` to the strip, in strip order
    fn write_pixels(&mut self, buffer: &PixelBuffer) -> Result<(), PixelError>;
}

impl<T: PixelSink + ?Sized> PixelSink for &mut T {
    fn write_pixels(&mut self, buffer: &PixelBuffer) -> Result<(), PixelError> {
        (**self).write_pixels(buffer)
    }
}
