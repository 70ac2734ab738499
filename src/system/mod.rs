//! Core data types and hardware seams
pub mod drivers;
pub mod frame_buffer;
pub mod mode;
pub mod protocol;
pub mod proximity;
