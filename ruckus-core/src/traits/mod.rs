//! Hardware and collaborator traits
//!
//! These traits define the interface between the matrix logic and the
//! pieces it drives: the pixel strip and the base pixel device.

pub mod base;
pub mod pixels;

pub use base::{ActionResponse, BaseDevice};
pub use pixels::{PixelError, PixelSink};
