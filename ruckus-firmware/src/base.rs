//! NeoPixel base device
//!
//! Owns the strip-level settings (name, brightness) and the raw pixel
//! actions. The LED matrix builds on it and passes these through.

use alloc::string::String;
use alloc::vec::Vec;

use defmt::*;
use portable_atomic::{AtomicU8, Ordering};
use serde::{Deserialize, Serialize};

use ruckus_core::config::{Color, ConfigError};
use ruckus_core::render::PixelBuffer;
use ruckus_core::traits::{ActionResponse, BaseDevice, PixelSink};

/// Global strip brightness, read by [`crate::pixels::DimmedPixels`]
pub static BRIGHTNESS: AtomicU8 = AtomicU8::new(255);

/// Action 0: fill the strip with one color, payload `[r, g, b(, w)]`
pub const ACTION_SET_COLORS: u8 = 0;

/// Action 1: set brightness, payload `0`-`255`
pub const ACTION_SET_BRIGHTNESS: u8 = 1;

const ACTIONS: [&str; 2] = ["setColors", "setBrightness"];

/// Strip settings as stored in the configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelsConfig {
    pub name: String,
    pub brightness: u8,
}

impl Default for PixelsConfig {
    fn default() -> Self {
        Self {
            name: String::from("RuckusLEDMatrix"),
            brightness: 64,
        }
    }
}

/// Fields of a configuration document this device cares about
#[derive(Deserialize)]
struct PixelsUpdate {
    name: Option<String>,
    brightness: Option<u8>,
}

/// NeoPixel strip device
pub struct NeoPixels {
    config: PixelsConfig,
    count: usize,
}

impl NeoPixels {
    /// Create a device for a strip of `count` pixels
    pub fn new(config: PixelsConfig, count: usize) -> Self {
        Self { config, count }
    }

    fn set_brightness(&mut self, level: u8) {
        self.config.brightness = level;
        BRIGHTNESS.store(level, Ordering::Relaxed);
    }
}

impl BaseDevice for NeoPixels {
    fn begin(&mut self) -> bool {
        BRIGHTNESS.store(self.config.brightness, Ordering::Relaxed);
        info!("NeoPixels started: {} pixels", self.count);
        true
    }

    fn actions(&self) -> &[&'static str] {
        &ACTIONS
    }

    fn set_config(&mut self, config: &str) -> Result<(), ConfigError> {
        let update: PixelsUpdate =
            serde_json::from_str(config).map_err(|_| ConfigError::Rejected)?;
        if let Some(name) = update.name {
            self.config.name = name;
        }
        if let Some(level) = update.brightness {
            self.set_brightness(level);
        }
        Ok(())
    }

    fn get_config(&self) -> String {
        serde_json::to_string(&self.config).unwrap_or_default()
    }

    fn receive_action<P: PixelSink>(
        &mut self,
        action: u8,
        payload: &str,
        pixels: &mut P,
    ) -> ActionResponse {
        match action {
            ACTION_SET_COLORS => {
                let Ok(channels) = serde_json::from_str::<Vec<u8>>(payload) else {
                    warn!("setColors payload is not a channel array");
                    return ActionResponse::failure("Expected [r, g, b] or [r, g, b, w]");
                };
                let Ok(color) = Color::new(&channels) else {
                    return ActionResponse::failure("Expected 3 or 4 channels");
                };
                match pixels.write_pixels(&PixelBuffer::filled(&color, self.count)) {
                    Ok(()) => ActionResponse::success(),
                    Err(e) => {
                        warn!("Pixel write failed: {:?}", e);
                        ActionResponse::failure("Pixel write failed")
                    }
                }
            }
            ACTION_SET_BRIGHTNESS => match payload.trim().parse::<u8>() {
                Ok(level) => {
                    self.set_brightness(level);
                    ActionResponse::success()
                }
                Err(_) => ActionResponse::failure("Brightness must be 0-255"),
            },
            _ => {
                warn!("Unknown action {}", action);
                ActionResponse::failure("Unknown action")
            }
        }
    }
}
