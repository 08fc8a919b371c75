//! Session timer state machine.
//!
//! The engine is tick-driven: it has no clock of its own. Something else
//! (the async [`driver`](super::driver), a test, the CLI simulator) calls
//! `tick()` once per elapsed second while the timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! Focus(stopped) --start--> Focus(running) --1500 ticks--> Break(stopped)
//! Break(stopped) --start--> Break(running) --300 ticks---> Focus(stopped)
//! ```
//!
//! A phase boundary always stops the countdown; the next phase waits for an
//! explicit `start()`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::phase::{format_clock, Phase, SESSIONS_PER_CYCLE};
use crate::error::ValidationError;
use crate::events::Event;
use crate::subject::{Priority, Subject, SubjectId, TopicRegistry};

/// The timer's read-only copy of the subject being studied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRef {
    pub id: SubjectId,
    pub name: String,
    pub priority: Priority,
}

impl From<&Subject> for TopicRef {
    fn from(s: &Subject) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            priority: s.priority,
        }
    }
}

/// Pomodoro session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTimer {
    phase: Phase,
    remaining_secs: u32,
    running: bool,
    completed_focus_sessions: u32,
    #[serde(default)]
    selected_topic: Option<TopicRef>,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    /// A stopped timer at the start of a Focus phase, with no topic.
    pub fn new() -> Self {
        Self {
            phase: Phase::Focus,
            remaining_secs: Phase::Focus.duration_secs(),
            running: false,
            completed_focus_sessions: 0,
            selected_topic: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_focus_sessions(&self) -> u32 {
        self.completed_focus_sessions
    }

    pub fn selected_topic(&self) -> Option<&TopicRef> {
        self.selected_topic.as_ref()
    }

    pub fn total_secs(&self) -> u32 {
        self.phase.duration_secs()
    }

    /// 0.0 .. 100.0 elapsed share of the current phase.
    pub fn progress_pct(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        f64::from(total - self.remaining_secs) / f64::from(total) * 100.0
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }

    /// `(completed sessions, cycle length)` for the "Session n/4" badge.
    /// The count is not wrapped.
    pub fn cycle_position(&self) -> (u32, u32) {
        (self.completed_focus_sessions, SESSIONS_PER_CYCLE)
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            running: self.running,
            completed_focus_sessions: self.completed_focus_sessions,
            topic: self.selected_topic.clone(),
            display: self.display(),
            progress_pct: self.progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or continue) counting down.
    ///
    /// Returns `Ok(None)` when already running. A Focus phase without a
    /// selected topic is refused and nothing changes.
    pub fn start(&mut self) -> Result<Option<Event>, ValidationError> {
        if self.running {
            return Ok(None);
        }
        if self.phase == Phase::Focus && self.selected_topic.is_none() {
            warn!("focus start refused: no topic selected");
            return Err(ValidationError::TopicRequired);
        }
        self.running = true;
        debug!(phase = ?self.phase, remaining = self.remaining_secs, "timer started");
        Ok(Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            topic: self.topic_name(),
            at: Utc::now(),
        }))
    }

    /// Stop counting down. Returns an event only if the timer was running.
    pub fn pause(&mut self) -> Option<Event> {
        let was_running = std::mem::replace(&mut self.running, false);
        if !was_running {
            return None;
        }
        debug!(remaining = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop and rewind the current phase. Phase and session count are kept.
    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.remaining_secs = self.phase.duration_secs();
        debug!(phase = ?self.phase, "timer reset");
        Event::TimerReset {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance by one second. Returns `Some(Event::PhaseCompleted)` when the
    /// phase runs out; no-op while stopped.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        let completed = self.phase;
        self.running = false;
        if completed == Phase::Focus {
            self.completed_focus_sessions += 1;
        }
        self.phase = completed.next();
        self.remaining_secs = self.phase.duration_secs();
        info!(
            completed = ?completed,
            sessions = self.completed_focus_sessions,
            "phase completed"
        );

        let (topic_id, topic, priority) = match (completed, &self.selected_topic) {
            (Phase::Focus, Some(t)) => (Some(t.id.clone()), Some(t.name.clone()), Some(t.priority)),
            _ => (None, None, None),
        };
        Some(Event::PhaseCompleted {
            completed,
            next: self.phase,
            completed_focus_sessions: self.completed_focus_sessions,
            topic_id,
            topic,
            priority,
            at: Utc::now(),
        })
    }

    /// Choose the subject to focus on. Only allowed during Focus.
    pub fn select_topic(&mut self, topic: TopicRef) -> Result<Event, ValidationError> {
        if self.phase == Phase::Break {
            return Err(ValidationError::TopicDuringBreak);
        }
        debug!(topic = %topic.name, "topic selected");
        self.selected_topic = Some(topic.clone());
        Ok(Event::TopicSelected {
            topic,
            at: Utc::now(),
        })
    }

    /// Look the subject up in `registry` and select it.
    pub fn select_topic_from(
        &mut self,
        registry: &impl TopicRegistry,
        id: &SubjectId,
    ) -> Result<Event, ValidationError> {
        let subject = registry
            .get(id)
            .ok_or_else(|| ValidationError::UnknownSubject(id.to_string()))?;
        self.select_topic(TopicRef::from(subject))
    }

    /// Deselect the current subject. Only allowed during Focus.
    pub fn clear_topic(&mut self) -> Result<Event, ValidationError> {
        if self.phase == Phase::Break {
            return Err(ValidationError::TopicDuringBreak);
        }
        self.selected_topic = None;
        Ok(Event::TopicCleared { at: Utc::now() })
    }

    fn topic_name(&self) -> Option<String> {
        match self.phase {
            Phase::Focus => self.selected_topic.as_ref().map(|t| t.name.clone()),
            Phase::Break => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::SubjectRegistry;

    fn algebra() -> TopicRef {
        TopicRef {
            id: SubjectId::new("alg"),
            name: "Algebra".into(),
            priority: Priority::High,
        }
    }

    fn tick_n(timer: &mut SessionTimer, n: u32) -> Vec<Event> {
        (0..n).filter_map(|_| timer.tick()).collect()
    }

    #[test]
    fn new_timer_is_stopped_focus() {
        let t = SessionTimer::new();
        assert_eq!(t.phase(), Phase::Focus);
        assert_eq!(t.remaining_secs(), 1500);
        assert!(!t.is_running());
        assert_eq!(t.completed_focus_sessions(), 0);
        assert!(t.selected_topic().is_none());
    }

    #[test]
    fn start_without_topic_is_refused() {
        let mut t = SessionTimer::new();
        assert_eq!(t.start(), Err(ValidationError::TopicRequired));
        assert!(!t.is_running());
        assert_eq!(t, SessionTimer::new());
    }

    #[test]
    fn start_twice_is_noop() {
        let mut t = SessionTimer::new();
        t.select_topic(algebra()).unwrap();
        assert!(t.start().unwrap().is_some());
        assert!(t.start().unwrap().is_none());
        assert!(t.is_running());
    }

    #[test]
    fn tick_while_stopped_is_noop() {
        let mut t = SessionTimer::new();
        assert!(t.tick().is_none());
        assert_eq!(t.remaining_secs(), 1500);
    }

    #[test]
    fn algebra_focus_scenario() {
        let mut t = SessionTimer::new();
        t.select_topic(algebra()).unwrap();
        t.start().unwrap();
        assert!(t.is_running());

        assert!(tick_n(&mut t, 1499).is_empty());
        assert_eq!(t.remaining_secs(), 1);
        assert_eq!(t.phase(), Phase::Focus);

        let ev = t.tick().expect("phase completes");
        assert_eq!(t.phase(), Phase::Break);
        assert_eq!(t.remaining_secs(), 300);
        assert_eq!(t.completed_focus_sessions(), 1);
        assert!(!t.is_running());
        match ev {
            Event::PhaseCompleted {
                completed,
                next,
                topic_id,
                topic,
                priority,
                ..
            } => {
                assert_eq!(completed, Phase::Focus);
                assert_eq!(next, Phase::Break);
                assert_eq!(topic_id, Some(algebra().id));
                assert_eq!(topic.as_deref(), Some("Algebra"));
                assert_eq!(priority, Some(Priority::High));
            }
            other => panic!("expected PhaseCompleted, got {other:?}"),
        }
    }

    #[test]
    fn break_completes_after_300_ticks() {
        let mut t = SessionTimer::new();
        t.select_topic(algebra()).unwrap();
        t.start().unwrap();
        tick_n(&mut t, 1500);

        // Break may start without touching the topic.
        t.start().unwrap();
        let events = tick_n(&mut t, 300);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::PhaseCompleted { completed: Phase::Break, topic_id: None, topic: None, .. }
        ));
        assert_eq!(t.phase(), Phase::Focus);
        assert_eq!(t.remaining_secs(), 1500);
        assert_eq!(t.completed_focus_sessions(), 1);
        assert!(!t.is_running());
    }

    #[test]
    fn ticks_after_boundary_do_nothing_until_restart() {
        let mut t = SessionTimer::new();
        t.select_topic(algebra()).unwrap();
        t.start().unwrap();
        tick_n(&mut t, 1500);
        assert!(tick_n(&mut t, 50).is_empty());
        assert_eq!(t.remaining_secs(), 300);
    }

    #[test]
    fn reset_restores_duration_only() {
        let mut t = SessionTimer::new();
        t.select_topic(algebra()).unwrap();
        t.start().unwrap();
        tick_n(&mut t, 1500);
        t.start().unwrap();
        tick_n(&mut t, 42);

        t.reset();
        assert_eq!(t.phase(), Phase::Break);
        assert_eq!(t.remaining_secs(), 300);
        assert_eq!(t.completed_focus_sessions(), 1);
        assert!(!t.is_running());
    }

    #[test]
    fn pause_reports_only_when_running() {
        let mut t = SessionTimer::new();
        assert!(t.pause().is_none());
        t.select_topic(algebra()).unwrap();
        t.start().unwrap();
        tick_n(&mut t, 5);
        assert!(matches!(
            t.pause(),
            Some(Event::TimerPaused { remaining_secs: 1495, .. })
        ));
        assert!(!t.is_running());
    }

    #[test]
    fn topic_cannot_change_during_break() {
        let mut t = SessionTimer::new();
        t.select_topic(algebra()).unwrap();
        t.start().unwrap();
        tick_n(&mut t, 1500);

        let other = TopicRef {
            id: SubjectId::new("geo"),
            name: "Geometry".into(),
            priority: Priority::Low,
        };
        assert_eq!(t.select_topic(other), Err(ValidationError::TopicDuringBreak));
        assert_eq!(t.clear_topic(), Err(ValidationError::TopicDuringBreak));
        assert_eq!(t.selected_topic().unwrap().name, "Algebra");
    }

    #[test]
    fn select_from_registry() {
        let reg = SubjectRegistry::seeded();
        let mut t = SessionTimer::new();
        t.select_topic_from(&reg, &SubjectId::new("2")).unwrap();
        assert_eq!(t.selected_topic().unwrap().name, "History");
        assert!(matches!(
            t.select_topic_from(&reg, &SubjectId::new("missing")),
            Err(ValidationError::UnknownSubject(_))
        ));
    }

    #[test]
    fn cleared_topic_blocks_next_focus_start() {
        let mut t = SessionTimer::new();
        t.select_topic(algebra()).unwrap();
        t.clear_topic().unwrap();
        assert_eq!(t.start(), Err(ValidationError::TopicRequired));
    }

    #[test]
    fn progress_and_display() {
        let mut t = SessionTimer::new();
        assert_eq!(t.display(), "25:00");
        assert_eq!(t.progress_pct(), 0.0);
        t.select_topic(algebra()).unwrap();
        t.start().unwrap();
        tick_n(&mut t, 750);
        assert_eq!(t.display(), "12:30");
        assert!((t.progress_pct() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cycle_position_counts_every_session() {
        let mut t = SessionTimer::new();
        t.select_topic(algebra()).unwrap();
        for _ in 0..4 {
            t.start().unwrap();
            tick_n(&mut t, 1500);
            t.start().unwrap();
            tick_n(&mut t, 300);
        }
        assert_eq!(t.cycle_position(), (4, 4));

        t.start().unwrap();
        tick_n(&mut t, 1500);
        assert_eq!(t.completed_focus_sessions(), 5);
        assert_eq!(t.cycle_position(), (5, 4));
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let t = SessionTimer::new();
        match t.snapshot() {
            Event::StateSnapshot {
                phase,
                remaining_secs,
                running,
                display,
                ..
            } => {
                assert_eq!(phase, Phase::Focus);
                assert_eq!(remaining_secs, 1500);
                assert!(!running);
                assert_eq!(display, "25:00");
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
