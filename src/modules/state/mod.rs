pub mod history;
pub mod manager;
pub mod session;

pub use history::{HistoryEntry, HistoryKind, StateHistory, HISTORY_CAPACITY};
pub use manager::{GlobalMetrics, SessionManager};
pub use session::{
    CombinedApplied, CurrentState, EmotionApplied, EmotionUpdate, MotionRequest, SessionHandle,
    SessionMetrics, SessionSnapshot,
};
