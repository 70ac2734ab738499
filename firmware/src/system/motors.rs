//! Wheel Motors
//!
//! Drives the two wheels through a TB6612FNG. The control loop speaks in signed
//! speed units; [`FULL_SCALE_SPEED`] of them is full PWM duty.

use defmt::warn;
use embassy_rp::gpio::{self, Output};
use embassy_rp::pwm::{self, Pwm};
use puck2bt::MotorSink;
use tb6612fng::{DriveCommand, Motor, Tb6612fng};

use crate::system::resources::MotorDriverResources;

/// Speed mapped to 100% duty
pub const FULL_SCALE_SPEED: i16 = 400;

/// Motor PWM frequency. Cheaper DC motors work better at lower frequencies.
const PWM_FREQ_HZ: u32 = 10_000;

type WheelMotor = Motor<Output<'static>, Output<'static>, Pwm<'static>>;

type Driver = Tb6612fng<
    Output<'static>,
    Output<'static>,
    Pwm<'static>,
    Output<'static>,
    Output<'static>,
    Pwm<'static>,
    Output<'static>,
>;

/// Converts a signed speed to a drive command
fn drive_command(speed: i16) -> DriveCommand {
    let duty = (speed.unsigned_abs().min(FULL_SCALE_SPEED as u16) as u32 * 100
        / FULL_SCALE_SPEED as u32) as u8;
    match speed {
        0 => DriveCommand::Stop,
        s if s > 0 => DriveCommand::Forward(duty),
        _ => DriveCommand::Backward(duty),
    }
}

fn drive(motor: &mut WheelMotor, speed: i16) {
    if motor.drive(drive_command(speed)).is_err() {
        warn!("motors: drive command {} failed", speed);
    }
}

pub struct Wheels {
    control: Driver,
}

impl Wheels {
    /// Sets up the driver and takes it out of standby
    pub fn new(r: MotorDriverResources) -> Self {
        let clock_freq_hz = embassy_rp::clocks::clk_sys_freq();

        // Calculate minimum divider needed to keep period under 16-bit limit (65535)
        let divider = ((clock_freq_hz / PWM_FREQ_HZ) / 65535 + 1) as u8;
        let period = (clock_freq_hz / (PWM_FREQ_HZ * divider as u32)) as u16 - 1;

        let mut pwm_config = pwm::Config::default();
        pwm_config.divider = divider.into();
        pwm_config.top = period;

        let stby = gpio::Output::new(r.standby_pin, gpio::Level::Low);

        // motor A, here defined to be the left motor
        let left_fwd = gpio::Output::new(r.left_forward_pin, gpio::Level::Low);
        let left_bckw = gpio::Output::new(r.left_backward_pin, gpio::Level::Low);
        let left_pwm = Pwm::new_output_a(r.left_slice, r.left_pwm_pin, pwm_config.clone());
        let left_motor = Motor::new(left_fwd, left_bckw, left_pwm).unwrap();

        // motor B, here defined to be the right motor
        let right_fwd = gpio::Output::new(r.right_forward_pin, gpio::Level::Low);
        let right_bckw = gpio::Output::new(r.right_backward_pin, gpio::Level::Low);
        let right_pwm = Pwm::new_output_b(r.right_slice, r.right_pwm_pin, pwm_config);
        let right_motor = Motor::new(right_fwd, right_bckw, right_pwm).unwrap();

        let mut control = Tb6612fng::new(left_motor, right_motor, stby).unwrap();
        control.disable_standby().unwrap();

        Self { control }
    }
}

impl MotorSink for Wheels {
    fn set_speeds(&mut self, left: i16, right: i16) {
        drive(&mut self.control.motor_a, left);
        drive(&mut self.control.motor_b, right);
    }
}
