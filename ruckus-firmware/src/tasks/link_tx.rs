//! Controller UART transmit task
//!
//! Sends reply frames queued by the matrix task.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use ruckus_protocol::frame::MAX_FRAME_SIZE;

use crate::channels::REPLY_CHANNEL;

/// Link TX task - sends reply frames to the controller
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let frame = REPLY_CHANNEL.receive().await;
        match frame.encode(&mut buf) {
            Ok(len) => {
                if let Err(e) = tx.write_all(&buf[..len]).await {
                    warn!("Failed to send reply: {:?}", e);
                } else {
                    trace!("Reply sent: {} bytes", len);
                }
            }
            Err(e) => {
                warn!("Failed to encode reply: {:?}", e);
            }
        }
    }
}
