//! Mode switches
//!
//! Two switches closed to ground. A closed switch sets its selector bit.

use embassy_rp::gpio::{Input, Pull};
use puck2bt::system::mode::{SEL_MOTION, SEL_SENSING};
use puck2bt::ModeSource;

use crate::system::resources::SelectorResources;

pub struct Switches {
    motion: Input<'static>,
    sensing: Input<'static>,
}

impl Switches {
    pub fn new(r: SelectorResources) -> Self {
        Self {
            motion: Input::new(r.motion_pin, Pull::Up),
            sensing: Input::new(r.sensing_pin, Pull::Up),
        }
    }
}

impl ModeSource for Switches {
    fn read(&mut self) -> u8 {
        let mut selector = 0;
        if self.motion.is_low() {
            selector |= SEL_MOTION;
        }
        if self.sensing.is_low() {
            selector |= SEL_SENSING;
        }
        selector
    }
}
