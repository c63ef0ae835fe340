//! RP2040-specific HAL for the LED matrix firmware
//!
//! Implementations of the shared traits for the RP2040:
//!
//! - Flash storage driver (implements `ruckus_hal::FlashStorage`)
//! - PIO-driven WS2812/SK6812 output (implements `ruckus_core::PixelSink`)

#![no_std]

pub mod flash;
pub mod ws2812;

pub use flash::Rp2040FlashStorage;
pub use ws2812::{pack_pixel, PioPixels};

// Re-export shared traits from ruckus-hal for convenience
pub use ruckus_hal::{FlashStorage as FlashStorageTrait, StorageKey};
