//! Control Loop
//!
//! Cooperative scheduler tying the state machines together. A single loop owns every
//! collaborator and the frame double buffer; per tick it
//! 1. reads the mode selector,
//! 2. samples the proximity sensors and updates the obstacle indicator,
//! 3. steps obstacle avoidance,
//! 4. steps the frame transmitter,
//! 5. steps frame capture,
//! 6. sleeps for the tick interval.
//!
//! The fixed step order is what keeps the double buffer consistent: within a tick the
//! transmitter releases a slot before the producer looks for a free one, and every
//! machine sees the mode and buffer state left behind by the machine before it.
//!
//! Before the first tick the loop waits at a startup gate until the selector reads
//! non-zero.

use embedded_hal_async::delay::DelayNs;

use crate::config::{Config, ConfigError, FRAME_SIZE};
use crate::system::drivers::{
    CameraSource, Drivers, ModeSource, MotorSink, ObstacleIndicator, SensorSource, SerialLink,
    TestPatternCamera,
};
use crate::system::frame_buffer::FramePair;
use crate::system::mode::Mode;
use crate::system::proximity::ProximityReading;
use crate::task::frame_capture::{CapturePhase, FrameCapture};
use crate::task::frame_transmit::{FrameTransmitter, TransmitPhase};
use crate::task::obstacle_avoid::{AvoidanceState, ObstacleAvoidance, Speeds};

fn millis(duration: embassy_time::Duration) -> u32 {
    duration.as_millis().min(u32::MAX as u64) as u32
}

/// The robot's control loop
pub struct ControlLoop<S, M, C, L, X, I = (), const N: usize = FRAME_SIZE> {
    drivers: Drivers<S, M, C, L, X, I>,
    config: Config,
    mode: Mode,
    reading: ProximityReading,
    frames: FramePair<N>,
    avoidance: ObstacleAvoidance,
    transmitter: FrameTransmitter,
    capture: FrameCapture,
    test_pattern: TestPatternCamera,
}

impl<S, M, C, L, X, I, const N: usize> ControlLoop<S, M, C, L, X, I, N>
where
    S: SensorSource,
    M: MotorSink,
    C: CameraSource,
    L: SerialLink,
    X: ModeSource,
    I: ObstacleIndicator,
{
    /// Validates `config` against the frame buffer and builds the state machines
    pub fn new(drivers: Drivers<S, M, C, L, X, I>, config: Config) -> Result<Self, ConfigError> {
        config.validate(N)?;
        Ok(Self {
            drivers,
            mode: Mode::IDLE,
            reading: ProximityReading::default(),
            frames: FramePair::new(),
            avoidance: ObstacleAvoidance::new(Speeds {
                moving: config.moving_speed,
                turning: config.turning_speed,
            }),
            transmitter: FrameTransmitter::new(&config),
            capture: FrameCapture::new(),
            test_pattern: TestPatternCamera,
            config,
        })
    }

    /// Waits out the settle delay, then holds at the startup gate until the selector
    /// reads non-zero. No state machine is stepped while waiting.
    pub async fn start<D: DelayNs>(&mut self, delay: &mut D) -> Mode {
        info!("control loop: settling");
        delay.delay_ms(millis(self.config.settle_delay)).await;

        loop {
            let selector = self.drivers.selector.read();
            delay.delay_ms(millis(self.config.gate_poll_interval)).await;
            if selector != 0 {
                let mode = Mode::from_selector(selector);
                info!("control loop: released with selector {}", selector);
                return mode;
            }
        }
    }

    /// Runs one tick: each enabled state machine advances by at most one transition
    pub fn tick(&mut self) {
        let mode = Mode::from_selector(self.drivers.selector.read());
        if mode != self.mode {
            info!("control loop: mode {} -> {}", self.mode, mode);
            self.mode = mode;
        }
        let modules = self.config.modules;

        if modules.proximity {
            self.reading = ProximityReading::new(self.drivers.sensors.sample());
            self.drivers.indicator.show_direction(self.reading.closest());
        }

        if modules.motion {
            self.avoidance
                .step(&self.reading, mode.motion_enabled(), &mut self.drivers.motors);
        }

        if modules.transmission {
            self.transmitter
                .step(mode.sensing_enabled(), &mut self.frames, &mut self.drivers.link);
        }

        if modules.camera {
            self.capture
                .step(mode.sensing_enabled(), &mut self.frames, &mut self.drivers.camera);
        } else {
            self.capture
                .step(mode.sensing_enabled(), &mut self.frames, &mut self.test_pattern);
        }
    }

    /// Passes the startup gate, then ticks forever
    pub async fn run<D: DelayNs>(&mut self, delay: &mut D) {
        self.start(delay).await;
        info!("control loop: running");
        loop {
            self.tick();
            delay.delay_ms(millis(self.config.tick_interval)).await;
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn reading(&self) -> &ProximityReading {
        &self.reading
    }

    pub fn avoidance_state(&self) -> AvoidanceState {
        self.avoidance.state()
    }

    pub fn transmit_phase(&self) -> TransmitPhase {
        self.transmitter.phase()
    }

    pub fn capture_phase(&self) -> CapturePhase {
        self.capture.phase()
    }

    pub fn frames(&self) -> &FramePair<N> {
        &self.frames
    }

    pub fn drivers(&self) -> &Drivers<S, M, C, L, X, I> {
        &self.drivers
    }

    pub fn drivers_mut(&mut self) -> &mut Drivers<S, M, C, L, X, I> {
        &mut self.drivers
    }
}
