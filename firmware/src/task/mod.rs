pub mod control;
pub mod proximity_read;
pub mod serial_link;
