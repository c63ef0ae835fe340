//! Controller UART receive task
//!
//! Receives frames from the robot's main controller and queues them for
//! the matrix task.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use ruckus_core::device::AddressText;
use ruckus_protocol::{ControllerMessage, FrameParser};

use crate::channels::{MatrixCommand, PayloadText, MATRIX_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - receives and parses frames from the controller
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match ControllerMessage::from_frame(&frame) {
                            Ok(message) => {
                                if let Some(command) = to_command(message) {
                                    // Arrival order is processing order; wait for room
                                    MATRIX_CHANNEL.send(command).await;
                                }
                            }
                            Err(e) => {
                                warn!("Failed to parse controller message: {:?}", e);
                            }
                        },
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Copy a borrowed message into an owned command
fn to_command(message: ControllerMessage<'_>) -> Option<MatrixCommand> {
    let command = match message {
        ControllerMessage::Event(event) => MatrixCommand::Event(event),
        ControllerMessage::SetConfig { persist, config } => MatrixCommand::SetConfig {
            persist,
            config: owned_text(config)?,
        },
        ControllerMessage::GetConfig => MatrixCommand::GetConfig,
        ControllerMessage::Action { action, payload } => MatrixCommand::Action {
            action,
            payload: owned_text(payload)?,
        },
        ControllerMessage::SetAddress(address) => {
            let mut text = AddressText::new();
            if text.push_str(address).is_err() {
                warn!("Address too long, dropped");
                return None;
            }
            MatrixCommand::SetAddress(text)
        }
    };
    Some(command)
}

fn owned_text(text: &str) -> Option<PayloadText> {
    let mut owned = PayloadText::new();
    // A frame payload always fits
    owned.push_str(text).ok()?;
    Some(owned)
}
