//! Operating Mode
//!
//! The robot's mode is read from an external selector once per tick. Two bits of the
//! selector value gate the subsystems independently:
//! - bit value 1: motion (obstacle avoidance drives the wheels)
//! - bit value 2: sensing (frame capture and transmission)
//!
//! All other bits are ignored, but any non-zero selector value releases the startup gate.

/// Selector bit enabling the motion subsystem
pub const SEL_MOTION: u8 = 1;

/// Selector bit enabling the camera and transmission subsystems
pub const SEL_SENSING: u8 = 2;

/// Mode bitmask derived from the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mode(u8);

impl Mode {
    /// Both subsystems disabled
    pub const IDLE: Mode = Mode(0);

    /// Derives the mode from a raw selector value
    pub const fn from_selector(selector: u8) -> Self {
        Mode(selector & (SEL_MOTION | SEL_SENSING))
    }

    pub const fn motion_enabled(self) -> bool {
        self.0 & SEL_MOTION != 0
    }

    pub const fn sensing_enabled(self) -> bool {
        self.0 & SEL_SENSING != 0
    }
}
