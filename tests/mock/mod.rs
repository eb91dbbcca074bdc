pub mod engine_mock;

pub use engine_mock::{ScriptedRng, TestTurnData};
