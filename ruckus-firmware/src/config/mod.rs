//! Configuration persistence
//!
//! The matrix configuration document lives in flash under its own key.
//! Defaults for the base device are compiled in from `matrix.json`.

pub mod loader;

pub use loader::{ConfigPersistence, ConfigText, PersistError};
