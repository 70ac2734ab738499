//! Control Task
//!
//! Owns every collaborator of the control loop and runs it forever. There is no
//! camera on this board, so frames come from the test pattern.

use defmt::{error, info};
use embassy_time::Delay;
use puck2bt::config::FRAME_SIZE;
use puck2bt::{Config, ControlLoop, Drivers, Modules, TestPatternCamera};

use crate::system::indicator::RgbIndicator;
use crate::system::motors::Wheels;
use crate::system::proximity::SharedProximity;
use crate::system::resources::{IndicatorResources, MotorDriverResources, SelectorResources};
use crate::system::selector::Switches;
use crate::system::serial::QueuedLink;

#[embassy_executor::task]
pub async fn control(
    motors: MotorDriverResources,
    selector: SelectorResources,
    indicator: IndicatorResources,
) {
    let drivers = Drivers {
        sensors: SharedProximity,
        motors: Wheels::new(motors),
        camera: TestPatternCamera,
        link: QueuedLink::default(),
        selector: Switches::new(selector),
        indicator: RgbIndicator::new(indicator),
    };
    let config = Config {
        modules: Modules {
            camera: false,
            ..Modules::ALL
        },
        ..Config::default()
    };

    let mut control = match ControlLoop::<_, _, _, _, _, _, FRAME_SIZE>::new(drivers, config) {
        Ok(control) => control,
        Err(e) => {
            error!("control: invalid configuration: {}", e);
            return;
        }
    };

    info!("control: {}", config);
    control.run(&mut Delay).await;
}
