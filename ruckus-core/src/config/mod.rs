//! Display configuration
//!
//! The active color and matrix geometry, plus the JSON configuration
//! document shared with the base pixel device.

pub mod codec;
pub mod display;

pub use codec::{color_from_document, merge_color, parse_color, serialize_color, ColorText};
pub use display::{Color, ConfigError, DisplayConfig, MAX_CHANNELS};
