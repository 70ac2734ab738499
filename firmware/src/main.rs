//! Robot firmware entry point
//!
//! Initializes the system and spawns the sensor, serial link and control tasks.

#![no_std]
#![no_main]

use crate::task::{control::control, proximity_read::proximity_read, serial_link::serial_link};
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use system::resources::{
    AssignedResources, IndicatorResources, MotorDriverResources, ProximityResources,
    SelectorResources, UartResources,
};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Hardware bindings
mod system;
/// Task implementations
mod task;

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());

    let r = split_resources!(p);

    // The control task only ever reads what these two publish
    spawner.spawn(proximity_read(r.proximity)).unwrap();
    spawner.spawn(serial_link(r.uart)).unwrap();
    spawner
        .spawn(control(r.motor_driver, r.selector, r.indicator))
        .unwrap();
}
