pub mod animation;
pub mod emotion;
pub mod state;
