//! State machines and the loop that steps them
pub mod control_loop;
pub mod frame_capture;
pub mod frame_transmit;
pub mod obstacle_avoid;
