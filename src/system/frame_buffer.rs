//! Frame Double Buffer
//!
//! Two fixed frame slots shared by the capture state machine (producer) and the
//! transmit state machine (consumer).
//!
//! # Ownership
//! Each slot carries a `ready` flag, and the flag decides who may touch the slot:
//! - `ready == false`: only the producer may write it. It claims a [`FillToken`] and
//!   hands the token back through [`FramePair::publish`], which sets `ready`.
//! - `ready == true`: only the transmitter may read it. It claims a [`SendToken`] and
//!   hands the token back through [`FramePair::release`], which clears `ready`.
//!
//! Tokens cannot be cloned or built outside this module. Dropping a token without
//! handing it back leaves the flag as it was, which is what an abandoned capture or
//! send needs. There is no lock: both state machines are stepped one after the
//! other from the same loop.

use crate::config::FRAME_SIZE;

/// One of the two frame slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    /// Slots in preference order
    pub const ALL: [Slot; 2] = [Slot::First, Slot::Second];

    pub const fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

/// Write permission for a free slot, held by the producer while capturing
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct FillToken {
    slot: Slot,
}

impl FillToken {
    pub fn slot(&self) -> Slot {
        self.slot
    }
}

/// Read permission for a ready slot, held by the transmitter while sending
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct SendToken {
    slot: Slot,
}

impl SendToken {
    pub fn slot(&self) -> Slot {
        self.slot
    }
}

struct FrameBuffer<const N: usize> {
    data: [u8; N],
    ready: bool,
}

/// The two frame slots
pub struct FramePair<const N: usize = FRAME_SIZE> {
    slots: [FrameBuffer<N>; 2],
}

impl<const N: usize> FramePair<N> {
    pub const fn new() -> Self {
        Self {
            slots: [
                FrameBuffer {
                    data: [0; N],
                    ready: false,
                },
                FrameBuffer {
                    data: [0; N],
                    ready: false,
                },
            ],
        }
    }

    /// Whether `slot` holds a captured frame that has not been sent yet
    pub fn is_ready(&self, slot: Slot) -> bool {
        self.slots[slot.index()].ready
    }

    /// Claims the first slot that is not ready, preferring [`Slot::First`]
    pub fn claim_free(&self) -> Option<FillToken> {
        Slot::ALL
            .into_iter()
            .find(|slot| !self.is_ready(*slot))
            .map(|slot| FillToken { slot })
    }

    /// Claims the first ready slot, preferring [`Slot::First`]
    pub fn claim_ready(&self) -> Option<SendToken> {
        Slot::ALL
            .into_iter()
            .find(|slot| self.is_ready(*slot))
            .map(|slot| SendToken { slot })
    }

    /// Writable frame behind a fill token
    pub fn frame_mut(&mut self, token: &FillToken) -> &mut [u8] {
        &mut self.slots[token.slot.index()].data
    }

    /// Readable frame behind a send token
    pub fn frame(&self, token: &SendToken) -> &[u8] {
        &self.slots[token.slot.index()].data
    }

    /// Marks the captured frame ready, ending the producer's write access
    pub fn publish(&mut self, token: FillToken) {
        let buffer = &mut self.slots[token.slot.index()];
        debug_assert!(!buffer.ready, "published a slot that was already ready");
        buffer.ready = true;
    }

    /// Marks the sent frame free, ending the transmitter's read access
    pub fn release(&mut self, token: SendToken) {
        let buffer = &mut self.slots[token.slot.index()];
        debug_assert!(buffer.ready, "released a slot that was not ready");
        buffer.ready = false;
    }
}

impl<const N: usize> Default for FramePair<N> {
    fn default() -> Self {
        Self::new()
    }
}
