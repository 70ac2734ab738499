//! Hardware Collaborators
//!
//! Traits the control loop uses to reach the robot's hardware. Every call is
//! non-blocking: polls return immediately and commands are fire-and-forget. The
//! firmware binds them to real peripherals, tests bind them to scripted doubles.

use crate::system::proximity::PROXIMITY_SENSORS;

/// Proximity sensor bank
pub trait SensorSource {
    /// Samples all sensors
    fn sample(&mut self) -> [u16; PROXIMITY_SENSORS];
}

/// Wheel motors
pub trait MotorSink {
    /// Sets signed left and right wheel speeds
    fn set_speeds(&mut self, left: i16, right: i16);
}

/// Camera capturing into caller-owned frame memory
pub trait CameraSource {
    /// Starts capturing a frame into `frame`
    fn launch_capture(&mut self, frame: &mut [u8]);

    /// Polls the running capture. Returns `true` once `frame` holds the complete image.
    fn capture_ready(&mut self, frame: &mut [u8]) -> bool;
}

/// Serial link to the remote host
pub trait SerialLink {
    /// A previous `send` is still on its way out
    fn is_sending(&mut self) -> bool;

    /// Queues `bytes` for transmission. Callers check [`SerialLink::is_sending`] first.
    fn send(&mut self, bytes: &[u8]);

    /// A received byte is waiting
    fn has_byte(&mut self) -> bool;

    /// Takes the next received byte. Only valid after [`SerialLink::has_byte`] returned `true`.
    fn read_byte(&mut self) -> u8;
}

/// Hands all of `bytes` to `write`, which may accept only a prefix of what it is
/// given per call (a ring buffer that stops at its wrap point, for instance).
///
/// Returns how many bytes were accepted. Stops early once `write` accepts nothing.
pub fn queue_all(bytes: &[u8], mut write: impl FnMut(&[u8]) -> usize) -> usize {
    let mut queued = 0;
    while queued < bytes.len() {
        match write(&bytes[queued..]) {
            0 => break,
            n => queued += n,
        }
    }
    queued
}

/// Mode selector input
pub trait ModeSource {
    /// Raw selector value
    fn read(&mut self) -> u8;
}

/// Shows which sensor sees the closest obstacle
pub trait ObstacleIndicator {
    fn show_direction(&mut self, sensor: Option<usize>);
}

/// No indicator fitted
impl ObstacleIndicator for () {
    fn show_direction(&mut self, _sensor: Option<usize>) {}
}

/// Camera stand-in that produces a fixed ramp image.
///
/// The frame is filled with `data[i] = i` (wrapping at 256) when the capture is
/// launched, and the capture reports complete on the first poll. Used when the
/// camera module is disabled or no camera is fitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestPatternCamera;

impl CameraSource for TestPatternCamera {
    fn launch_capture(&mut self, frame: &mut [u8]) {
        for (i, pixel) in frame.iter_mut().enumerate() {
            *pixel = i as u8;
        }
    }

    fn capture_ready(&mut self, _frame: &mut [u8]) -> bool {
        true
    }
}

/// All collaborators the control loop needs
pub struct Drivers<S, M, C, L, X, I = ()> {
    pub sensors: S,
    pub motors: M,
    pub camera: C,
    pub link: L,
    pub selector: X,
    pub indicator: I,
}
