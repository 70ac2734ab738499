//! Latest proximity reading
//!
//! The `proximity_read` task samples the sensors at its own pace and stores the
//! filtered values here. The control loop takes a snapshot once per tick without
//! waiting.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use puck2bt::system::proximity::PROXIMITY_SENSORS;
use puck2bt::SensorSource;

static LATEST: Mutex<CriticalSectionRawMutex, Cell<[u16; PROXIMITY_SENSORS]>> =
    Mutex::new(Cell::new([0; PROXIMITY_SENSORS]));

/// Stores a new reading for the control loop
pub fn publish(values: [u16; PROXIMITY_SENSORS]) {
    LATEST.lock(|latest| latest.set(values));
}

/// [`SensorSource`] reading the values last published by the sensor task
pub struct SharedProximity;

impl SensorSource for SharedProximity {
    fn sample(&mut self) -> [u16; PROXIMITY_SENSORS] {
        LATEST.lock(|latest| latest.get())
    }
}
