//! Proximity Readings
//!
//! Eight IR proximity sensors ring the robot. Index 0 looks forward-right and the
//! indices run clockwise seen from above, so 7 looks forward-left:
//!
//! ```text
//!          7   0
//!       6         1
//!       5         2
//!          4   3
//! ```
//!
//! Larger values mean a closer object.

/// Number of proximity sensors
pub const PROXIMITY_SENSORS: usize = 8;

/// Threshold for the forward-facing sensors (0, 1, 6, 7)
pub const FRONT_THRESHOLD: u16 = 300;

/// Threshold for the side-facing sensors (2, 5)
pub const SIDE_THRESHOLD: u16 = 1500;

/// One sample of all proximity sensors, refreshed every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProximityReading([u16; PROXIMITY_SENSORS]);

impl ProximityReading {
    pub const fn new(values: [u16; PROXIMITY_SENSORS]) -> Self {
        Self(values)
    }

    /// An obstacle blocks the path on the right
    pub fn right_obstructed(&self) -> bool {
        let s = &self.0;
        s[0] > FRONT_THRESHOLD || s[1] > FRONT_THRESHOLD || s[2] > SIDE_THRESHOLD
    }

    /// An obstacle blocks the path on the left
    pub fn left_obstructed(&self) -> bool {
        let s = &self.0;
        s[7] > FRONT_THRESHOLD || s[6] > FRONT_THRESHOLD || s[5] > SIDE_THRESHOLD
    }

    /// Index of the sensor that sees the closest object.
    ///
    /// The first sensor wins ties. `None` when every sensor reads zero.
    pub fn closest(&self) -> Option<usize> {
        let mut closest = None;
        let mut highest = 0;
        for (index, &value) in self.0.iter().enumerate() {
            if value > highest {
                highest = value;
                closest = Some(index);
            }
        }
        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(index: usize, value: u16) -> ProximityReading {
        let mut values = [0; PROXIMITY_SENSORS];
        values[index] = value;
        ProximityReading::new(values)
    }

    #[test]
    fn right_predicate_uses_sensors_0_1_2() {
        assert!(with(0, 301).right_obstructed());
        assert!(with(1, 301).right_obstructed());
        assert!(with(2, 1501).right_obstructed());

        assert!(!with(0, 300).right_obstructed());
        assert!(!with(1, 300).right_obstructed());
        assert!(!with(2, 1500).right_obstructed());
        assert!(!with(2, 1000).right_obstructed());
        assert!(!with(7, 4000).right_obstructed());
    }

    #[test]
    fn left_predicate_mirrors_on_sensors_7_6_5() {
        assert!(with(7, 301).left_obstructed());
        assert!(with(6, 301).left_obstructed());
        assert!(with(5, 1501).left_obstructed());

        assert!(!with(7, 300).left_obstructed());
        assert!(!with(6, 300).left_obstructed());
        assert!(!with(5, 1500).left_obstructed());
        assert!(!with(0, 4000).left_obstructed());
    }

    #[test]
    fn rear_sensors_never_obstruct() {
        let reading = ProximityReading::new([0, 0, 0, 4000, 4000, 0, 0, 0]);
        assert!(!reading.right_obstructed());
        assert!(!reading.left_obstructed());
    }

    #[test]
    fn closest_picks_first_maximum() {
        assert_eq!(ProximityReading::default().closest(), None);
        assert_eq!(with(4, 12).closest(), Some(4));
        let tie = ProximityReading::new([0, 90, 0, 0, 0, 90, 0, 0]);
        assert_eq!(tie.closest(), Some(1));
    }
}
