pub mod driver;
mod engine;
mod phase;

pub use driver::{DriverConfig, TimerHandle};
pub use engine::{SessionTimer, TopicRef};
pub use phase::{format_clock, Phase, BREAK_SECS, FOCUS_SECS, SESSIONS_PER_CYCLE};
