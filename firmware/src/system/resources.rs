//! Hardware Resource Management
//!
//! Allocates pins and peripherals to the firmware's tasks. Each group below is moved
//! into exactly one task by `split_resources!` in `main`.
//!
//! # Resource Groups
//! - Proximity: ADC and the 8:1 analog multiplexer in front of the IR sensors
//! - Selector: two mode switches
//! - Indicator: PWM-controlled RGB LED
//! - Motor Control: TB6612FNG pins and PWM slices
//! - UART: serial link to the host (Bluetooth module)

use assign_resources::assign_resources;
use embassy_rp::adc::InterruptHandler as AdcInterruptHandler;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{self, UART0};
use embassy_rp::uart::InterruptHandler as UartInterruptHandler;

assign_resources! {
    /// IR proximity sensors, read through a 74HC4051 multiplexer
    proximity: ProximityResources {
        adc: ADC,
        sensor_pin: PIN_26,
        select_0: PIN_10,
        select_1: PIN_11,
        select_2: PIN_12,
    },
    /// Mode switches, closed to ground when on
    selector: SelectorResources {
        motion_pin: PIN_16,
        sensing_pin: PIN_17,
    },
    /// PWM-controlled RGB LED showing the obstacle side
    indicator: IndicatorResources {
        pwm_red: PWM_SLICE1,
        pwm_green: PWM_SLICE2,
        red_pin: PIN_2,
        green_pin: PIN_4,
    },
    /// TB6612FNG dual motor driver pins and PWM channels
    motor_driver: MotorDriverResources {
        standby_pin: PIN_22,
        // Motor drive PWM
        left_slice: PWM_SLICE6,
        left_pwm_pin: PIN_28,
        left_forward_pin: PIN_21,
        left_backward_pin: PIN_20,
        // Motor drive PWM
        right_slice: PWM_SLICE5,
        right_pwm_pin: PIN_27,
        right_forward_pin: PIN_19,
        right_backward_pin: PIN_18,
    },
    /// Serial link to the host
    uart: UartResources {
        uart: UART0,
        tx_pin: PIN_0,
        rx_pin: PIN_1,
        tx_dma: DMA_CH0,
        rx_dma: DMA_CH1,
    },
}

bind_interrupts!(pub struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
    UART0_IRQ => UartInterruptHandler<UART0>;
});
