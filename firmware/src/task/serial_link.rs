//! Serial Link Task
//!
//! Moves bytes between the UART and the queues in [`crate::system::serial`].
//! Transmission and reception run side by side in the same task.

use defmt::{info, warn};
use embassy_futures::join::join;
use embassy_rp::uart::{self, Uart};

use crate::system::resources::{Irqs, UartResources};
use crate::system::serial::{self, RX_BYTES, TX_PIPE};

/// Baud rate of the Bluetooth module
const BAUDRATE: u32 = 115_200;

/// Bytes handed to the UART per write
const TX_CHUNK: usize = 64;

#[embassy_executor::task]
pub async fn serial_link(r: UartResources) {
    let mut config = uart::Config::default();
    config.baudrate = BAUDRATE;
    let uart = Uart::new(r.uart, r.tx_pin, r.rx_pin, Irqs, r.tx_dma, r.rx_dma, config);
    let (mut tx, mut rx) = uart.split();
    info!("serial: link up at {} baud", BAUDRATE);

    let transmit = async {
        let mut chunk = [0u8; TX_CHUNK];
        loop {
            let len = TX_PIPE.read(&mut chunk).await;
            if tx.write(&chunk[..len]).await.is_err() {
                warn!("serial: UART write failed, {} bytes lost", len);
            }
            serial::mark_sent();
        }
    };

    let receive = async {
        let mut byte = [0u8; 1];
        loop {
            match rx.read(&mut byte).await {
                Ok(()) => RX_BYTES.send(byte[0]).await,
                Err(e) => warn!("serial: UART read failed: {}", e),
            }
        }
    };

    join(transmit, receive).await;
}
