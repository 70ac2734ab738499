//! Serial link queues
//!
//! The control loop writes messages into [`TX_PIPE`] and takes received bytes from
//! [`RX_BYTES`] without ever waiting. The `serial_link` task moves bytes between the
//! queues and the UART.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::warn;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::pipe::Pipe;
use puck2bt::config::FRAME_SIZE;
use puck2bt::{queue_all, SerialLink};

/// Room for one full frame, the largest message
pub const TX_CAPACITY: usize = 2048;

const _: () = assert!(TX_CAPACITY >= FRAME_SIZE);

/// Received bytes not yet looked at by the control loop
const RX_CAPACITY: usize = 32;

/// Outgoing bytes not yet handed to the UART
pub static TX_PIPE: Pipe<CriticalSectionRawMutex, TX_CAPACITY> = Pipe::new();

/// Bytes received from the host
pub static RX_BYTES: Channel<CriticalSectionRawMutex, u8, RX_CAPACITY> = Channel::new();

/// Set from `send` until the UART has written the last queued byte
static SENDING: AtomicBool = AtomicBool::new(false);

/// Called by the serial task once the pipe is drained and the UART is done
pub fn mark_sent() {
    if TX_PIPE.is_empty() {
        SENDING.store(false, Ordering::Release);
    }
}

/// [`SerialLink`] over the static queues
#[derive(Default)]
pub struct QueuedLink {
    peeked: Option<u8>,
}

impl SerialLink for QueuedLink {
    fn is_sending(&mut self) -> bool {
        SENDING.load(Ordering::Acquire)
    }

    fn send(&mut self, bytes: &[u8]) {
        SENDING.store(true, Ordering::Release);
        // try_write stops at the ring's wrap point
        let queued = queue_all(bytes, |chunk| TX_PIPE.try_write(chunk).unwrap_or(0));
        if queued < bytes.len() {
            warn!("serial: transmit queue full, queued {} of {} bytes", queued, bytes.len());
        }
    }

    fn has_byte(&mut self) -> bool {
        if self.peeked.is_none() {
            self.peeked = RX_BYTES.try_receive().ok();
        }
        self.peeked.is_some()
    }

    fn read_byte(&mut self) -> u8 {
        match self.peeked.take() {
            Some(byte) => byte,
            None => RX_BYTES.try_receive().unwrap_or_default(),
        }
    }
}
