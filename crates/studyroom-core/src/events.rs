use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::subject::{Priority, SubjectId};
use crate::timer::{Phase, TopicRef};

/// Every state change of the session timer produces an Event.
/// Front ends render them; notifiers turn the interesting ones into alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u32,
        topic: Option<String>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// A start request was refused; the timer did not change.
    StartRejected {
        reason: String,
        at: DateTime<Utc>,
    },
    TopicSelected {
        topic: TopicRef,
        at: DateTime<Utc>,
    },
    TopicCleared {
        at: DateTime<Utc>,
    },
    /// A phase ran down to zero. The timer is now stopped at the start of
    /// `next`.
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        completed_focus_sessions: u32,
        #[serde(default)]
        topic_id: Option<SubjectId>,
        topic: Option<String>,
        priority: Option<Priority>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        remaining_secs: u32,
        total_secs: u32,
        running: bool,
        completed_focus_sessions: u32,
        topic: Option<TopicRef>,
        display: String,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name of the variant, matching the serialized tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "TimerStarted",
            Event::TimerPaused { .. } => "TimerPaused",
            Event::TimerReset { .. } => "TimerReset",
            Event::StartRejected { .. } => "StartRejected",
            Event::TopicSelected { .. } => "TopicSelected",
            Event::TopicCleared { .. } => "TopicCleared",
            Event::PhaseCompleted { .. } => "PhaseCompleted",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}
