//! Frame Capture
//!
//! Producer side of the frame double buffer. While sensing is enabled it keeps the
//! camera busy filling whichever slot is free, preferring the first slot, and marks
//! a slot ready as soon as its capture completes.
//!
//! Disabling sensing drops the capture in progress on the spot; the camera is not
//! told. A camera that never reports completion parks the machine in `Capturing`.

use crate::system::drivers::CameraSource;
use crate::system::frame_buffer::{FillToken, FramePair, Slot};

/// States of the capture state machine
#[derive(Debug, PartialEq, Eq)]
pub enum CaptureState {
    Inactive,
    Idle,
    /// Capturing into the slot behind the token
    Capturing(FillToken),
}

/// Token-free view of [`CaptureState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CapturePhase {
    Inactive,
    Idle,
    Capturing(Slot),
}

impl CaptureState {
    pub fn phase(&self) -> CapturePhase {
        match self {
            CaptureState::Inactive => CapturePhase::Inactive,
            CaptureState::Idle => CapturePhase::Idle,
            CaptureState::Capturing(token) => CapturePhase::Capturing(token.slot()),
        }
    }
}

/// What the state machine observed this tick
#[derive(Debug)]
pub struct CaptureInputs {
    pub sensing_enabled: bool,
    /// A free slot, claimed only when the machine is idle
    pub free_slot: Option<FillToken>,
    /// The running capture completed
    pub capture_done: bool,
}

/// Side effect requested by a transition
#[derive(Debug, PartialEq, Eq)]
pub enum CaptureAction {
    /// Start capturing into the slot now held by the `Capturing` state
    Launch,
    /// The capture completed, hand the slot to the transmitter
    Publish(FillToken),
}

/// Computes the next state and the action to perform, if any
pub fn transition(state: CaptureState, inputs: CaptureInputs) -> (CaptureState, Option<CaptureAction>) {
    match state {
        CaptureState::Inactive if inputs.sensing_enabled => (CaptureState::Idle, None),
        CaptureState::Inactive => (CaptureState::Inactive, None),
        _ if !inputs.sensing_enabled => (CaptureState::Inactive, None),
        CaptureState::Idle => match inputs.free_slot {
            Some(token) => (CaptureState::Capturing(token), Some(CaptureAction::Launch)),
            None => (CaptureState::Idle, None),
        },
        CaptureState::Capturing(token) if inputs.capture_done => {
            (CaptureState::Idle, Some(CaptureAction::Publish(token)))
        }
        capturing => (capturing, None),
    }
}

/// Frame capture state machine
pub struct FrameCapture {
    state: CaptureState,
}

impl FrameCapture {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Inactive,
        }
    }

    pub fn phase(&self) -> CapturePhase {
        self.state.phase()
    }

    /// Advances by at most one transition
    pub fn step<const N: usize>(
        &mut self,
        sensing_enabled: bool,
        frames: &mut FramePair<N>,
        camera: &mut impl CameraSource,
    ) {
        let state = core::mem::replace(&mut self.state, CaptureState::Inactive);
        let before = state.phase();

        // Only poll what the current state looks at
        let inputs = match &state {
            CaptureState::Idle if sensing_enabled => CaptureInputs {
                sensing_enabled,
                free_slot: frames.claim_free(),
                capture_done: false,
            },
            CaptureState::Capturing(token) if sensing_enabled => CaptureInputs {
                sensing_enabled,
                free_slot: None,
                capture_done: camera.capture_ready(frames.frame_mut(token)),
            },
            _ => CaptureInputs {
                sensing_enabled,
                free_slot: None,
                capture_done: false,
            },
        };

        let (next, action) = transition(state, inputs);
        match (action, &next) {
            (Some(CaptureAction::Launch), CaptureState::Capturing(token)) => {
                camera.launch_capture(frames.frame_mut(token));
            }
            (Some(CaptureAction::Publish(token)), _) => {
                info!("capture: frame ready in {}", token.slot());
                frames.publish(token);
            }
            _ => {}
        }

        if next.phase() != before {
            debug!("capture: {} -> {}", before, next.phase());
        }
        self.state = next;
    }
}

impl Default for FrameCapture {
    fn default() -> Self {
        Self::new()
    }
}
