//! Board-agnostic core logic for the RoboRuckus LED matrix
//!
//! This crate contains all display logic that does not depend on
//! specific hardware implementations:
//!
//! - Fixed 5x5 glyph catalog
//! - Display configuration and its JSON document
//! - Glyph renderer producing linear pixel buffers
//! - Event state machine (persistent vs transient images)
//! - Timed sequences (damage flash, address digits)
//! - The composed [`LedMatrix`] device and its hardware traits

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

extern crate alloc;

#[macro_use]
mod fmt;

pub mod config;
pub mod device;
pub mod glyph;
pub mod render;
pub mod sequence;
pub mod state;
pub mod traits;

pub use device::{LedMatrix, MatrixError};
pub use glyph::Glyph;
pub use render::{render, PixelBuffer};
pub use traits::{ActionResponse, BaseDevice, PixelSink};
