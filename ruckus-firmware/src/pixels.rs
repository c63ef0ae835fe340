//! Brightness-scaled pixel output

use portable_atomic::Ordering;

use ruckus_core::render::PixelBuffer;
use ruckus_core::traits::{PixelError, PixelSink};

use crate::base::BRIGHTNESS;

/// Wraps a strip and applies the global brightness to every frame
pub struct DimmedPixels<S> {
    inner: S,
}

impl<S> DimmedPixels<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: PixelSink> PixelSink for DimmedPixels<S> {
    fn write_pixels(&mut self, buffer: &PixelBuffer) -> Result<(), PixelError> {
        match BRIGHTNESS.load(Ordering::Relaxed) {
            u8::MAX => self.inner.write_pixels(buffer),
            level => self.inner.write_pixels(&buffer.scaled(level)),
        }
    }
}
