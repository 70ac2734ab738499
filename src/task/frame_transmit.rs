//! Frame Transmission
//!
//! Consumer side of the frame double buffer. Runs the handshake with the remote host
//! and streams every ready frame to it.
//!
//! # Handshake
//! ```text
//! robot                         host
//!   | -- header{CONFIG, len} -->  |
//!   | <--------- ACK ----------   |
//!   | -- ConfigPayload -------->  |
//!   | -- header{VISUAL, len} -->  |   for every ready frame
//!   | <--------- ACK ----------   |
//!   | -- frame bytes ---------->  |
//! ```
//!
//! Each write waits for the link to be idle. While waiting for an ACK, one received
//! byte is consumed per tick and anything other than [`ACK`] is dropped. There is no
//! timeout: without an ACK the machine waits until sensing is disabled, which resets
//! it to `Init` without telling the host.

use crate::config::Config;
use crate::system::drivers::SerialLink;
use crate::system::frame_buffer::{FramePair, SendToken, Slot};
use crate::system::protocol::{ConfigPayload, MessageHeader, WireBytes, ACK};

/// States of the transmit state machine
#[derive(Debug, PartialEq, Eq)]
pub enum TransmitState {
    Init,
    /// Waiting to send the CONFIG header
    Config,
    /// Waiting for the host to acknowledge the CONFIG header
    ConfigAck { acked: bool },
    /// Waiting for a ready frame
    Visual,
    /// Waiting for the host to acknowledge the VISUAL header
    VisualAck { token: SendToken, acked: bool },
    /// Waiting for the frame bytes to leave the link
    VisualSent { token: SendToken },
}

/// Token-free view of [`TransmitState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitPhase {
    Init,
    Config,
    ConfigAck,
    Visual,
    VisualAck(Slot),
    VisualSent(Slot),
}

impl TransmitState {
    pub fn phase(&self) -> TransmitPhase {
        match self {
            TransmitState::Init => TransmitPhase::Init,
            TransmitState::Config => TransmitPhase::Config,
            TransmitState::ConfigAck { .. } => TransmitPhase::ConfigAck,
            TransmitState::Visual => TransmitPhase::Visual,
            TransmitState::VisualAck { token, .. } => TransmitPhase::VisualAck(token.slot()),
            TransmitState::VisualSent { token } => TransmitPhase::VisualSent(token.slot()),
        }
    }

    fn awaits_ack(&self) -> bool {
        matches!(
            self,
            TransmitState::ConfigAck { acked: false } | TransmitState::VisualAck { acked: false, .. }
        )
    }
}

/// What the state machine observed this tick
#[derive(Debug)]
pub struct TransmitInputs {
    pub sensing_enabled: bool,
    pub link_idle: bool,
    /// Byte read from the link, only while an ACK is outstanding
    pub received: Option<u8>,
    /// A ready frame, claimed only in `Visual` while the link is idle
    pub ready_frame: Option<SendToken>,
}

/// Write or buffer update requested by a transition
#[derive(Debug, PartialEq, Eq)]
pub enum TransmitAction {
    SendConfigHeader,
    SendConfigPayload,
    SendVisualHeader,
    /// Send the frame behind the `VisualSent` token
    SendFrame,
    /// The frame has left the link, hand the slot back to the producer
    Release(SendToken),
}

/// Computes the next state and the action to perform, if any
pub fn transition(
    state: TransmitState,
    inputs: TransmitInputs,
) -> (TransmitState, Option<TransmitAction>) {
    use TransmitState::*;

    if !inputs.sensing_enabled {
        return (Init, None);
    }

    match state {
        Init => (Config, None),
        Config if inputs.link_idle => (
            ConfigAck { acked: false },
            Some(TransmitAction::SendConfigHeader),
        ),
        ConfigAck { acked: false } if inputs.received.is_some() => (
            ConfigAck {
                acked: inputs.received == Some(ACK),
            },
            None,
        ),
        ConfigAck { acked: true } if inputs.link_idle => {
            (Visual, Some(TransmitAction::SendConfigPayload))
        }
        Visual => match inputs.ready_frame {
            Some(token) if inputs.link_idle => (
                VisualAck {
                    token,
                    acked: false,
                },
                Some(TransmitAction::SendVisualHeader),
            ),
            _ => (Visual, None),
        },
        VisualAck {
            token,
            acked: false,
        } if inputs.received.is_some() => (
            VisualAck {
                token,
                acked: inputs.received == Some(ACK),
            },
            None,
        ),
        VisualAck { token, acked: true } if inputs.link_idle => {
            (VisualSent { token }, Some(TransmitAction::SendFrame))
        }
        VisualSent { token } if inputs.link_idle => {
            (Visual, Some(TransmitAction::Release(token)))
        }
        waiting => (waiting, None),
    }
}

/// Frame transmit state machine
pub struct FrameTransmitter {
    state: TransmitState,
    config_header: WireBytes,
    config_payload: WireBytes,
    visual_header: WireBytes,
}

impl FrameTransmitter {
    /// Builds the transmitter and encodes the messages it resends unchanged.
    ///
    /// `config` must have passed [`Config::validate`].
    pub(crate) fn new(config: &Config) -> Self {
        let width = config.int_width;
        let payload = ConfigPayload {
            rows: config.rows as u32,
            cols: config.cols as u32,
        };
        debug_assert!(config.validate(config.rows * config.cols).is_ok());
        let frame_len = (config.rows * config.cols) as u32;
        Self {
            state: TransmitState::Init,
            config_header: MessageHeader::config(width).encode(width),
            config_payload: payload.encode(width),
            visual_header: MessageHeader::visual(frame_len).encode(width),
        }
    }

    pub fn phase(&self) -> TransmitPhase {
        self.state.phase()
    }

    /// Advances by at most one transition
    pub fn step<const N: usize>(
        &mut self,
        sensing_enabled: bool,
        frames: &mut FramePair<N>,
        link: &mut impl SerialLink,
    ) {
        let state = core::mem::replace(&mut self.state, TransmitState::Init);
        let before = state.phase();

        // A pending byte is consumed ahead of any write, matching the ACK wait order
        let received = if sensing_enabled && state.awaits_ack() && link.has_byte() {
            let byte = link.read_byte();
            if byte != ACK {
                trace!("transmit: dropped {=u8:#x} while waiting for ACK", byte);
            }
            Some(byte)
        } else {
            None
        };
        let link_idle = sensing_enabled && received.is_none() && !link.is_sending();
        let ready_frame = match state {
            TransmitState::Visual if link_idle => frames.claim_ready(),
            _ => None,
        };

        let inputs = TransmitInputs {
            sensing_enabled,
            link_idle,
            received,
            ready_frame,
        };
        let (next, action) = transition(state, inputs);

        match action {
            Some(TransmitAction::SendConfigHeader) => link.send(&self.config_header),
            Some(TransmitAction::SendConfigPayload) => {
                info!("transmit: handshake complete");
                link.send(&self.config_payload);
            }
            Some(TransmitAction::SendVisualHeader) => link.send(&self.visual_header),
            Some(TransmitAction::SendFrame) => {
                if let TransmitState::VisualSent { token } = &next {
                    link.send(frames.frame(token));
                }
            }
            Some(TransmitAction::Release(token)) => {
                info!("transmit: frame from {} sent", token.slot());
                frames.release(token);
            }
            None => {}
        }

        if next.phase() != before {
            debug!("transmit: {} -> {}", before, next.phase());
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Link {
        sending: bool,
        inbox: VecDeque<u8>,
        sent: Vec<Vec<u8>>,
    }

    impl SerialLink for Link {
        fn is_sending(&mut self) -> bool {
            self.sending
        }

        fn send(&mut self, bytes: &[u8]) {
            self.sent.push(bytes.to_vec());
        }

        fn has_byte(&mut self) -> bool {
            !self.inbox.is_empty()
        }

        fn read_byte(&mut self) -> u8 {
            self.inbox.pop_front().unwrap_or(0)
        }
    }

    fn small_config() -> Config {
        Config {
            rows: 2,
            cols: 2,
            ..Config::default()
        }
    }

    fn inputs(sensing_enabled: bool, link_idle: bool, received: Option<u8>) -> TransmitInputs {
        TransmitInputs {
            sensing_enabled,
            link_idle,
            received,
            ready_frame: None,
        }
    }

    #[test]
    fn config_header_waits_for_an_idle_link() {
        let (next, action) = transition(TransmitState::Config, inputs(true, false, None));
        assert_eq!((next, action), (TransmitState::Config, None));

        let (next, action) = transition(TransmitState::Config, inputs(true, true, None));
        assert_eq!(next, TransmitState::ConfigAck { acked: false });
        assert_eq!(action, Some(TransmitAction::SendConfigHeader));
    }

    #[test]
    fn non_ack_bytes_are_dropped() {
        let state = TransmitState::ConfigAck { acked: false };
        let (next, action) = transition(state, inputs(true, true, Some(b'x')));
        assert_eq!(next, TransmitState::ConfigAck { acked: false });
        assert_eq!(action, None);

        let (next, _) = transition(next, inputs(true, true, Some(ACK)));
        assert_eq!(next, TransmitState::ConfigAck { acked: true });
    }

    #[test]
    fn acked_config_waits_for_idle_before_payload() {
        let state = TransmitState::ConfigAck { acked: true };
        let (next, action) = transition(state, inputs(true, false, None));
        assert_eq!((next, action), (TransmitState::ConfigAck { acked: true }, None));

        let state = TransmitState::ConfigAck { acked: true };
        let (next, action) = transition(state, inputs(true, true, None));
        assert_eq!(next, TransmitState::Visual);
        assert_eq!(action, Some(TransmitAction::SendConfigPayload));
    }

    #[test]
    fn disabling_sensing_resets_every_state() {
        let mut frames = FramePair::<4>::new();
        frames.publish(frames.claim_free().unwrap());

        let states = [
            TransmitState::Init,
            TransmitState::Config,
            TransmitState::ConfigAck { acked: true },
            TransmitState::Visual,
            TransmitState::VisualAck {
                token: frames.claim_ready().unwrap(),
                acked: true,
            },
            TransmitState::VisualSent {
                token: frames.claim_ready().unwrap(),
            },
        ];
        for state in states {
            let (next, action) = transition(state, inputs(false, true, Some(ACK)));
            assert_eq!(next, TransmitState::Init);
            assert_eq!(action, None);
        }
        // the abandoned frame is still waiting to be sent
        assert!(frames.is_ready(Slot::First));
    }

    #[test]
    fn step_runs_the_full_exchange() {
        let config = small_config();
        let mut transmitter = FrameTransmitter::new(&config);
        let mut frames = FramePair::<4>::new();
        let mut link = Link::default();

        let fill = frames.claim_free().unwrap();
        frames.frame_mut(&fill).copy_from_slice(&[9, 8, 7, 6]);
        frames.publish(fill);

        transmitter.step(true, &mut frames, &mut link);
        assert_eq!(transmitter.phase(), TransmitPhase::Config);
        transmitter.step(true, &mut frames, &mut link);
        assert_eq!(transmitter.phase(), TransmitPhase::ConfigAck);

        link.inbox.extend([0x55, ACK]);
        transmitter.step(true, &mut frames, &mut link);
        transmitter.step(true, &mut frames, &mut link);
        assert_eq!(transmitter.phase(), TransmitPhase::ConfigAck);
        transmitter.step(true, &mut frames, &mut link);
        assert_eq!(transmitter.phase(), TransmitPhase::Visual);

        transmitter.step(true, &mut frames, &mut link);
        assert_eq!(transmitter.phase(), TransmitPhase::VisualAck(Slot::First));
        link.inbox.push_back(ACK);
        transmitter.step(true, &mut frames, &mut link);
        transmitter.step(true, &mut frames, &mut link);
        assert_eq!(transmitter.phase(), TransmitPhase::VisualSent(Slot::First));

        // the frame is still on the wire
        link.sending = true;
        transmitter.step(true, &mut frames, &mut link);
        assert!(frames.is_ready(Slot::First));
        link.sending = false;
        transmitter.step(true, &mut frames, &mut link);
        assert_eq!(transmitter.phase(), TransmitPhase::Visual);
        assert!(!frames.is_ready(Slot::First));

        assert_eq!(
            link.sent,
            [
                vec![0x01, 0x04, 0x00],
                vec![2, 0, 2, 0],
                vec![0x02, 0x04, 0x00],
                vec![9, 8, 7, 6],
            ]
        );
    }

    #[test]
    fn config_ack_does_not_carry_over_to_the_frame() {
        let config = small_config();
        let mut transmitter = FrameTransmitter::new(&config);
        let mut frames = FramePair::<4>::new();
        let mut link = Link::default();
        frames.publish(frames.claim_free().unwrap());

        transmitter.step(true, &mut frames, &mut link);
        transmitter.step(true, &mut frames, &mut link);
        link.inbox.push_back(ACK);
        transmitter.step(true, &mut frames, &mut link);
        transmitter.step(true, &mut frames, &mut link);
        transmitter.step(true, &mut frames, &mut link);
        assert_eq!(transmitter.phase(), TransmitPhase::VisualAck(Slot::First));

        for _ in 0..10 {
            transmitter.step(true, &mut frames, &mut link);
        }
        assert_eq!(transmitter.phase(), TransmitPhase::VisualAck(Slot::First));
        assert_eq!(link.sent.len(), 3);
    }
}
