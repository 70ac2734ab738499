//! Hardware bindings for the control loop's collaborators
pub mod indicator;
pub mod motors;
pub mod proximity;
pub mod resources;
pub mod selector;
pub mod serial;
