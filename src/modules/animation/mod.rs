pub mod motion;
pub mod parameters;
