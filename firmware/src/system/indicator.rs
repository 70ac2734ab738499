//! Obstacle Indicator
//!
//! Shows on the RGB LED which side the closest obstacle is on: red for the right
//! half of the sensor ring (sensors 0 to 3), green for the left half (4 to 7), off
//! when nothing is seen.

use embassy_rp::pwm::{self, Pwm, SetDutyCycle};
use puck2bt::ObstacleIndicator;

use crate::system::resources::IndicatorResources;

/// LED PWM frequency
const PWM_FREQ_HZ: u32 = 100;

/// First sensor of the left half
const LEFT_HALF: usize = 4;

pub struct RgbIndicator {
    red: Pwm<'static>,
    green: Pwm<'static>,
    shown: Option<bool>,
}

impl RgbIndicator {
    pub fn new(r: IndicatorResources) -> Self {
        let clock_freq_hz = embassy_rp::clocks::clk_sys_freq();

        // Calculate minimum divider needed to keep period under 16-bit limit (65535)
        let divider = ((clock_freq_hz / PWM_FREQ_HZ) / 65535 + 1) as u8;
        let period = (clock_freq_hz / (PWM_FREQ_HZ * divider as u32)) as u16 - 1;

        let mut config = pwm::Config::default();
        config.divider = divider.into();
        config.top = period;

        let mut red = Pwm::new_output_a(r.pwm_red, r.red_pin, config.clone());
        let mut green = Pwm::new_output_a(r.pwm_green, r.green_pin, config);
        let _ = red.set_duty_cycle_fully_off();
        let _ = green.set_duty_cycle_fully_off();

        Self {
            red,
            green,
            shown: None,
        }
    }
}

impl ObstacleIndicator for RgbIndicator {
    fn show_direction(&mut self, sensor: Option<usize>) {
        // Some(true) for the left half
        let side = sensor.map(|index| index >= LEFT_HALF);
        if side == self.shown {
            return;
        }
        self.shown = side;

        let (red, green) = match side {
            None => (false, false),
            Some(false) => (true, false),
            Some(true) => (false, true),
        };
        let _ = if red {
            self.red.set_duty_cycle_fully_on()
        } else {
            self.red.set_duty_cycle_fully_off()
        };
        let _ = if green {
            self.green.set_duty_cycle_fully_on()
        } else {
            self.green.set_duty_cycle_fully_off()
        };
    }
}
