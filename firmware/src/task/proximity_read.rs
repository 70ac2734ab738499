//! Proximity Sensor Reading
//!
//! Samples the eight IR proximity sensors through a 74HC4051 analog multiplexer on a
//! single ADC input and publishes median-filtered values for the control loop.
//!
//! # Sensor Layout
//! Sensor indices run clockwise from the front right, matching the obstruction
//! thresholds of the avoidance logic: 0 and 7 face forward, 2 and 5 face sideways.
//! Raw 12-bit ADC counts are published unchanged apart from the filtering; a higher
//! count means a closer obstacle.

use defmt::{trace, warn};
use embassy_rp::adc::{Adc, Channel, Config};
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_time::{Duration, Timer};
use moving_median::MovingMedian;
use puck2bt::system::proximity::PROXIMITY_SENSORS;

use crate::system::proximity;
use crate::system::resources::{Irqs, ProximityResources};

/// Time between two sweeps over all sensors
const SAMPLE_INTERVAL: Duration = Duration::from_millis(20);

/// Settling time after switching the multiplexer
const MUX_SETTLE: Duration = Duration::from_micros(50);

/// Median filter window per sensor
const MEDIAN_WINDOW_SIZE: usize = 5;

#[embassy_executor::task]
pub async fn proximity_read(r: ProximityResources) {
    let mut adc = Adc::new(r.adc, Irqs, Config::default());
    let mut channel = Channel::new_pin(r.sensor_pin, Pull::None);
    let mut select = [
        Output::new(r.select_0, Level::Low),
        Output::new(r.select_1, Level::Low),
        Output::new(r.select_2, Level::Low),
    ];

    let mut filters: [MovingMedian<f32, MEDIAN_WINDOW_SIZE>; PROXIMITY_SENSORS] =
        core::array::from_fn(|_| MovingMedian::new());

    // A sensor reads 0 until its filter holds a sample
    let mut sampled = [false; PROXIMITY_SENSORS];
    let mut values = [0u16; PROXIMITY_SENSORS];

    loop {
        for sensor in 0..PROXIMITY_SENSORS {
            for (bit, pin) in select.iter_mut().enumerate() {
                pin.set_level(Level::from(sensor & (1 << bit) != 0));
            }
            Timer::after(MUX_SETTLE).await;

            match adc.read(&mut channel).await {
                Ok(raw) => {
                    filters[sensor].add_value(f32::from(raw));
                    sampled[sensor] = true;
                }
                Err(_) => warn!("proximity: ADC read of sensor {} failed", sensor),
            }
            if sampled[sensor] {
                values[sensor] = filters[sensor].median() as u16;
            }
        }

        trace!("proximity: {}", values);
        proximity::publish(values);
        Timer::after(SAMPLE_INTERVAL).await;
    }
}
