//! Ruckus Hardware Abstraction Layer
//!
//! Traits implemented by chip-specific HALs so the matrix firmware can
//! persist its configuration without knowing the flash layout.
//!
//! - [`flash::FlashStorage`] - Persistent key-value storage

#![no_std]
#![deny(unsafe_code)]

pub mod flash;

pub use flash::{FlashError, FlashStorage, StorageKey};
