//! Timed display sequences
//!
//! A sequence is a short list of display steps, each with an offset from
//! the sequence start. The [`Timeline`] turns offsets into absolute
//! deadlines that the worker awaits, so no step ever blocks the executor.

pub mod steps;
pub mod timeline;

pub use steps::{
    Sequence, Step, TimedStep, DAMAGE_FLASH_MS, DIGIT_MS, GAP_MS, MAX_ADDRESS_DIGITS, MAX_STEPS,
    SETTLE_MS,
};
pub use timeline::Timeline;
