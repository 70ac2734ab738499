//! Obstacle Avoidance
//!
//! Drives forward until one side of the robot is obstructed, then turns in place
//! away from it until that side is clear again.
//!
//! # States
//! - `Init`: entered at startup and whenever motion is re-enabled
//! - `Forward`: both wheels at moving speed
//! - `TurnLeft` / `TurnRight`: wheels at turning speed in opposite directions
//! - `Stopped`: motion disabled, wheels at rest
//!
//! An obstacle on the right wins over one on the left. Every step takes at most one
//! transition, and a speed command is only issued when a transition sets new speeds.

use crate::system::drivers::MotorSink;
use crate::system::proximity::ProximityReading;

/// States of the avoidance state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AvoidanceState {
    Init,
    Forward,
    TurnLeft,
    TurnRight,
    Stopped,
}

/// Left and right wheel speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WheelSpeeds {
    pub left: i16,
    pub right: i16,
}

impl WheelSpeeds {
    pub const STOP: WheelSpeeds = WheelSpeeds { left: 0, right: 0 };
}

/// Speeds used by the avoidance logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speeds {
    pub moving: i16,
    pub turning: i16,
}

impl Speeds {
    fn forward(&self) -> WheelSpeeds {
        WheelSpeeds {
            left: self.moving,
            right: self.moving,
        }
    }

    fn turn_left(&self) -> WheelSpeeds {
        WheelSpeeds {
            left: -self.turning,
            right: self.turning,
        }
    }

    fn turn_right(&self) -> WheelSpeeds {
        WheelSpeeds {
            left: self.turning,
            right: -self.turning,
        }
    }
}

/// Computes the next state and the speed command to issue, if any
pub fn transition(
    state: AvoidanceState,
    reading: &ProximityReading,
    motion_enabled: bool,
    speeds: &Speeds,
) -> (AvoidanceState, Option<WheelSpeeds>) {
    use AvoidanceState::*;

    if !motion_enabled {
        return match state {
            Stopped => (Stopped, None),
            _ => (Stopped, Some(WheelSpeeds::STOP)),
        };
    }

    match state {
        Init => (Forward, Some(speeds.forward())),
        Forward if reading.right_obstructed() => (TurnLeft, Some(speeds.turn_left())),
        Forward if reading.left_obstructed() => (TurnRight, Some(speeds.turn_right())),
        TurnLeft if !reading.right_obstructed() => (Forward, Some(speeds.forward())),
        TurnRight if !reading.left_obstructed() => (Forward, Some(speeds.forward())),
        Stopped => (Init, None),
        unchanged => (unchanged, None),
    }
}

/// Obstacle avoidance state machine
pub struct ObstacleAvoidance {
    state: AvoidanceState,
    speeds: Speeds,
}

impl ObstacleAvoidance {
    pub fn new(speeds: Speeds) -> Self {
        Self {
            state: AvoidanceState::Init,
            speeds,
        }
    }

    pub fn state(&self) -> AvoidanceState {
        self.state
    }

    /// Advances by at most one transition and forwards any new speeds to the motors
    pub fn step(
        &mut self,
        reading: &ProximityReading,
        motion_enabled: bool,
        motors: &mut impl MotorSink,
    ) {
        let (next, command) = transition(self.state, reading, motion_enabled, &self.speeds);
        if next != self.state {
            debug!("avoidance: {} -> {}", self.state, next);
        }
        if let Some(speeds) = command {
            motors.set_speeds(speeds.left, speeds.right);
        }
        self.state = next;
    }
}
