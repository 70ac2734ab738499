//! Deterministic stand-ins for the robot's hardware
#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_hal_async::delay::DelayNs;
use puck2bt::{
    CameraSource, Config, ControlLoop, Drivers, ModeSource, Modules, MotorSink,
    ObstacleIndicator, SensorSource, SerialLink,
};

/// Frame length used by the integration tests (2 x 2 pixels)
pub const SMALL_FRAME: usize = 4;

pub type TestLoop = ControlLoop<
    FixedSensors,
    RecordingMotors,
    ManualCamera,
    FakeLink,
    Selector,
    RecordingIndicator,
    SMALL_FRAME,
>;

#[derive(Default)]
pub struct FixedSensors {
    pub values: [u16; 8],
    pub samples: usize,
}

impl SensorSource for FixedSensors {
    fn sample(&mut self) -> [u16; 8] {
        self.samples += 1;
        self.values
    }
}

#[derive(Default)]
pub struct RecordingMotors {
    pub commands: Vec<(i16, i16)>,
}

impl RecordingMotors {
    pub fn last(&self) -> Option<(i16, i16)> {
        self.commands.last().copied()
    }
}

impl MotorSink for RecordingMotors {
    fn set_speeds(&mut self, left: i16, right: i16) {
        self.commands.push((left, right));
    }
}

/// Camera whose captures complete while `complete` is set. A completed frame is
/// filled with the number of captures launched so far.
pub struct ManualCamera {
    pub launches: usize,
    pub complete: bool,
}

impl Default for ManualCamera {
    fn default() -> Self {
        Self {
            launches: 0,
            complete: true,
        }
    }
}

impl CameraSource for ManualCamera {
    fn launch_capture(&mut self, _frame: &mut [u8]) {
        self.launches += 1;
    }

    fn capture_ready(&mut self, frame: &mut [u8]) -> bool {
        if self.complete {
            frame.fill(self.launches as u8);
        }
        self.complete
    }
}

#[derive(Default)]
pub struct FakeLink {
    pub busy: bool,
    pub inbox: VecDeque<u8>,
    pub sent: Vec<Vec<u8>>,
}

impl FakeLink {
    pub fn ack(&mut self) {
        self.inbox.push_back(puck2bt::system::protocol::ACK);
    }
}

impl SerialLink for FakeLink {
    fn is_sending(&mut self) -> bool {
        self.busy
    }

    fn send(&mut self, bytes: &[u8]) {
        assert!(!self.busy, "send while the link was busy");
        self.sent.push(bytes.to_vec());
    }

    fn has_byte(&mut self) -> bool {
        !self.inbox.is_empty()
    }

    fn read_byte(&mut self) -> u8 {
        self.inbox.pop_front().expect("read_byte without a pending byte")
    }
}

/// Selector that plays back a script, then holds `value`
#[derive(Default)]
pub struct Selector {
    pub script: VecDeque<u8>,
    pub value: u8,
    pub reads: usize,
}

impl ModeSource for Selector {
    fn read(&mut self) -> u8 {
        self.reads += 1;
        self.script.pop_front().unwrap_or(self.value)
    }
}

#[derive(Default)]
pub struct RecordingIndicator {
    pub shown: Vec<Option<usize>>,
}

impl ObstacleIndicator for RecordingIndicator {
    fn show_direction(&mut self, sensor: Option<usize>) {
        self.shown.push(sensor);
    }
}

/// Delay that returns at once and records what it was asked for
#[derive(Default)]
pub struct CountingDelay {
    pub delays_ms: Vec<u32>,
}

impl DelayNs for CountingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.delays_ms.push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
    }
}

pub fn small_config(modules: Modules) -> Config {
    Config {
        modules,
        rows: 2,
        cols: 2,
        ..Config::default()
    }
}

pub fn drivers(selector: u8) -> Drivers<FixedSensors, RecordingMotors, ManualCamera, FakeLink, Selector, RecordingIndicator> {
    Drivers {
        sensors: FixedSensors::default(),
        motors: RecordingMotors::default(),
        camera: ManualCamera::default(),
        link: FakeLink::default(),
        selector: Selector {
            value: selector,
            ..Selector::default()
        },
        indicator: RecordingIndicator::default(),
    }
}

pub fn control_loop(selector: u8, modules: Modules) -> TestLoop {
    TestLoop::new(drivers(selector), small_config(modules)).expect("valid test config")
}

pub fn ticks(control: &mut TestLoop, count: usize) {
    for _ in 0..count {
        control.tick();
    }
}
