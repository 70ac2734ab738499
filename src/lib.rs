//! # puck2bt
//!
//! Onboard runtime of a small camera robot. The robot avoids obstacles with eight IR
//! proximity sensors, captures grayscale frames into a double buffer and streams them
//! to a host over a serial link, gated by acknowledgments from the host.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | ------- |
//! | [`system`] | Data types, wire protocol and the hardware collaborator traits |
//! | [`task`] | The three state machines and the cooperative control loop |
//! | [`config`] | Tunables and module selection |
//!
//! Everything here is hardware independent. The `firmware` crate in this workspace
//! binds the collaborator traits to RP2350 peripherals and runs
//! [`ControlLoop::run`] in an embassy task.
//!
//! ## Features
//!
//! - **`defmt`**: log state transitions through `defmt`

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod system;
pub mod task;

pub use config::{Config, ConfigError, Modules};
pub use system::drivers::{
    queue_all, CameraSource, Drivers, ModeSource, MotorSink, ObstacleIndicator, SensorSource,
    SerialLink, TestPatternCamera,
};
pub use system::mode::Mode;
pub use system::protocol::IntWidth;
pub use task::control_loop::ControlLoop;
