use serde::{Deserialize, Serialize};

/// Focus phase length: 25 minutes.
pub const FOCUS_SECS: u32 = 25 * 60;
/// Break phase length: 5 minutes.
pub const BREAK_SECS: u32 = 5 * 60;
/// Focus sessions per displayed cycle ("session n/4").
pub const SESSIONS_PER_CYCLE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn duration_secs(self) -> u32 {
        match self {
            Phase::Focus => FOCUS_SECS,
            Phase::Break => BREAK_SECS,
        }
    }

    /// The phase that follows this one.
    pub fn next(self) -> Phase {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::Break => "Break",
        }
    }
}

/// Render seconds as `MM:SS`. Minutes are not capped at 59.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
