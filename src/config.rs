//! Control Loop Configuration
//!
//! Tunables default to the values the robot was calibrated with. The firmware builds
//! a [`Config`] once at startup and hands it to the control loop, which validates it
//! against the frame buffer size before anything runs.

use core::fmt;

use embassy_time::Duration;

use crate::system::protocol::IntWidth;

/// Wheel speed while driving straight
pub const MOVING_SPEED: i16 = 200;

/// Wheel speed while turning in place
pub const TURNING_SPEED: i16 = 50;

/// Captured frame height in pixels
pub const FRAME_ROWS: usize = 25;

/// Captured frame width in pixels
pub const FRAME_COLS: usize = 64;

/// Captured frame size in bytes (one grayscale byte per pixel)
pub const FRAME_SIZE: usize = FRAME_ROWS * FRAME_COLS;

/// Pause at the end of every tick
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Pause between selector polls while waiting at the startup gate
pub const GATE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// One-time pause before the startup gate so the serial link stays quiet while the host comes up
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Which subsystems are part of this build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Modules {
    /// Sample proximity sensors every tick. When off, the avoidance logic sees an all-zero reading.
    pub proximity: bool,
    /// Step the obstacle avoidance state machine
    pub motion: bool,
    /// Capture from the real camera. When off, frames come from a test pattern.
    pub camera: bool,
    /// Step the frame transmitter
    pub transmission: bool,
}

impl Modules {
    pub const ALL: Modules = Modules {
        proximity: true,
        motion: true,
        camera: true,
        transmission: true,
    };
}

impl Default for Modules {
    fn default() -> Self {
        Self::ALL
    }
}

/// Runtime configuration of the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub modules: Modules,
    pub moving_speed: i16,
    pub turning_speed: i16,
    pub rows: usize,
    pub cols: usize,
    /// Width of the integer fields on the wire
    pub int_width: IntWidth,
    pub tick_interval: Duration,
    pub gate_poll_interval: Duration,
    pub settle_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modules: Modules::ALL,
            moving_speed: MOVING_SPEED,
            turning_speed: TURNING_SPEED,
            rows: FRAME_ROWS,
            cols: FRAME_COLS,
            int_width: IntWidth::U16,
            tick_interval: TICK_INTERVAL,
            gate_poll_interval: GATE_POLL_INTERVAL,
            settle_delay: SETTLE_DELAY,
        }
    }
}

impl Config {
    /// Checks the geometry against a frame buffer of `frame_len` bytes
    pub fn validate(&self, frame_len: usize) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::ZeroGeometry);
        }
        if self.rows.checked_mul(self.cols) != Some(frame_len) {
            return Err(ConfigError::FrameSizeMismatch {
                expected: frame_len,
                rows: self.rows,
                cols: self.cols,
            });
        }
        if frame_len as u64 > self.int_width.max_value() as u64 {
            return Err(ConfigError::FrameTooLarge {
                len: frame_len,
                width: self.int_width,
            });
        }
        Ok(())
    }
}

/// Reasons a [`Config`] cannot drive the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Rows or columns are zero
    ZeroGeometry,
    /// `rows * cols` does not match the frame buffer
    FrameSizeMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },
    /// The frame length does not fit the wire integer width
    FrameTooLarge { len: usize, width: IntWidth },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroGeometry => write!(f, "frame geometry has a zero dimension"),
            ConfigError::FrameSizeMismatch { expected, rows, cols } => write!(
                f,
                "{}x{} frame does not fill a {} byte buffer",
                rows, cols, expected
            ),
            ConfigError::FrameTooLarge { len, width } => {
                write!(f, "{} byte frame does not fit a {:?} length field", len, width)
            }
        }
    }
}
