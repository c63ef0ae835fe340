//! RoboRuckus matrix link protocol
//!
//! Defines the game events a robot device can receive and the UART-based
//! link between the robot's main controller and the LED matrix board.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The matrix board only consumes events; it never originates them.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod events;
pub mod frame;
pub mod messages;

pub use events::{EventKind, EventNotification};
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{ControllerMessage, DeviceReply};
