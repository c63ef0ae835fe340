//! Matrix worker task
//!
//! The only place display state changes. Commands are handled strictly in
//! arrival order; a running sequence is played out to its last step, each
//! step awaited at its deadline, before the next command is taken.

use defmt::*;
use embassy_rp::peripherals::PIO0;
use embassy_time::{Instant, Timer};

use ruckus_core::traits::ActionResponse;
use ruckus_core::{LedMatrix, MatrixError};
use ruckus_hal_rp2040::PioPixels;
use ruckus_protocol::{DeviceReply, Frame};

use crate::base::NeoPixels;
use crate::channels::{MatrixCommand, MATRIX_CHANNEL, REPLY_CHANNEL};
use crate::config::ConfigPersistence;
use crate::pixels::DimmedPixels;

/// The matrix as wired on this board
pub type Matrix = LedMatrix<NeoPixels, DimmedPixels<PioPixels<'static, PIO0, 0>>>;

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Matrix task - owns the device and its persisted configuration
#[embassy_executor::task]
pub async fn matrix_task(mut matrix: Matrix, mut persistence: ConfigPersistence<'static>) {
    info!("Matrix task started");

    begin(&mut matrix, &mut persistence).await;

    loop {
        while let Some(deadline) = matrix.next_deadline() {
            Timer::at(Instant::from_millis(deadline)).await;
            if let Err(e) = matrix.poll(now_ms()) {
                warn!("Sequence step failed: {:?}", e);
            }
        }

        let command = MATRIX_CHANNEL.receive().await;
        handle_command(&mut matrix, &mut persistence, command).await;
    }
}

/// Activate the matrix from the stored document, or from defaults
///
/// Defaults that cannot be saved leave the matrix out of service; it then
/// answers every request with a failure.
async fn begin(matrix: &mut Matrix, persistence: &mut ConfigPersistence<'static>) {
    let stored = match persistence.load().await {
        Ok(stored) => stored,
        Err(e) => {
            warn!("Stored configuration unreadable: {:?}", e);
            None
        }
    };

    let result = match matrix.activate(stored.as_deref(), now_ms()) {
        Err(MatrixError::Config(e)) if stored.is_some() => {
            warn!("Stored configuration rejected ({:?}), restoring defaults", e);
            matrix.activate(None, now_ms())
        }
        result => result,
    };

    match result {
        Ok(Some(defaults)) => {
            if let Err(e) = persistence.save(&defaults).await {
                error!("Failed to save default configuration: {:?}", e);
                matrix.deactivate();
                return;
            }
        }
        Ok(None) => {}
        Err(e) => {
            error!("Matrix activation failed: {:?}", e);
            return;
        }
    }

    info!("Device: {}", matrix.description().to_json().as_str());
}

async fn handle_command(
    matrix: &mut Matrix,
    persistence: &mut ConfigPersistence<'static>,
    command: MatrixCommand,
) {
    match command {
        MatrixCommand::Event(event) => {
            if let Err(e) = matrix.receive_event(event.as_ref(), now_ms()) {
                debug!("Event not shown: {:?}", e);
            }
        }
        MatrixCommand::SetConfig { persist, config } => {
            let response = match matrix.set_config(&config) {
                Ok(()) if persist => {
                    let saved = persistence.save(&config).await;
                    if let Err(e) = &saved {
                        warn!("Failed to save configuration: {:?}", e);
                    }
                    ActionResponse::success().require(saved, "Configuration not saved")
                }
                Ok(()) => ActionResponse::success(),
                Err(e) => {
                    warn!("Configuration not applied: {:?}", e);
                    ActionResponse::failure("Configuration rejected")
                }
            };
            reply_result(&response).await;
        }
        MatrixCommand::GetConfig => {
            let doc = matrix.get_config();
            let too_large = ActionResponse::failure("Configuration too large");
            reply(DeviceReply::Config(&doc).to_frame_or(&too_large.body)).await;
        }
        MatrixCommand::Action { action, payload } => {
            let response = match matrix.receive_action(action, &payload, now_ms()) {
                Ok(response) => response,
                Err(e) => {
                    warn!("Action {} failed: {:?}", action, e);
                    ActionResponse::failure("Action failed")
                }
            };
            reply_result(&response).await;
        }
        MatrixCommand::SetAddress(address) => {
            if let Err(e) = matrix.set_address(&address) {
                warn!("Address not set: {:?}", e);
            }
        }
    }
}

async fn reply_result(response: &ActionResponse) {
    let frame = DeviceReply::Result {
        success: response.success,
        body: &response.body,
    }
    .to_frame();
    reply(frame).await;
}

async fn reply(frame: Result<Frame, ruckus_protocol::FrameError>) {
    match frame {
        Ok(frame) => REPLY_CHANNEL.send(frame).await,
        Err(e) => warn!("Reply does not fit a frame: {:?}", e),
    }
}
