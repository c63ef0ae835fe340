//! Display state machine
//!
//! Which glyph is on the matrix, and which glyph it falls back to once a
//! transient image has had its turn. Every display change is a function
//! of the current state and an event.

pub mod machine;
pub mod reaction;

pub use machine::DisplayState;
pub use reaction::{reaction, Reaction};
