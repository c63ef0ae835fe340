//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::String;

use ruckus_core::device::AddressText;
use ruckus_protocol::{EventNotification, Frame, MAX_PAYLOAD_SIZE};

/// Channel capacity for matrix commands
const MATRIX_CHANNEL_SIZE: usize = 4;

/// Channel capacity for reply frames
const REPLY_CHANNEL_SIZE: usize = 4;

/// Text carried in a single frame
pub type PayloadText = String<MAX_PAYLOAD_SIZE>;

/// Work for the matrix task, in arrival order
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MatrixCommand {
    /// Game event; `None` when the frame did not decode
    Event(Option<EventNotification>),
    /// Apply a configuration document, saving it when `persist` is set
    SetConfig { persist: bool, config: PayloadText },
    /// Reply with the current configuration document
    GetConfig,
    /// Run an action by index
    Action { action: u8, payload: PayloadText },
    /// Record the robot's address
    SetAddress(AddressText),
}

/// Commands for the single matrix worker
pub static MATRIX_CHANNEL: Channel<CriticalSectionRawMutex, MatrixCommand, MATRIX_CHANNEL_SIZE> =
    Channel::new();

/// Reply frames for the controller link
pub static REPLY_CHANNEL: Channel<CriticalSectionRawMutex, Frame, REPLY_CHANNEL_SIZE> =
    Channel::new();
