//! User-facing notifications derived from timer events.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::events::Event;
use crate::subject::Priority;
use crate::timer::{Phase, FOCUS_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub body: String,
}

impl Notification {
    /// The alert a front end should show for `event`, if any.
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::PhaseCompleted {
                completed: Phase::Focus,
                topic,
                priority,
                ..
            } => {
                let name = topic.as_deref().unwrap_or("a subject");
                let mut body = format!(
                    "Well done! You studied {name} for {} minutes.",
                    FOCUS_SECS / 60
                );
                if *priority == Some(Priority::High) {
                    body.push_str(&format!(
                        " {name} is a high-priority subject, keep the momentum after your break."
                    ));
                }
                Some(Self {
                    severity: Severity::Info,
                    title: "Session complete!".into(),
                    body,
                })
            }
            Event::PhaseCompleted {
                completed: Phase::Break,
                ..
            } => Some(Self {
                severity: Severity::Info,
                title: "Break over!".into(),
                body: "Time to get back to studying with renewed energy!".into(),
            }),
            Event::StartRejected { .. } => Some(Self {
                severity: Severity::Warning,
                title: "Select a subject".into(),
                body: "Choose what you are going to study before starting the timer.".into(),
            }),
            _ => None,
        }
    }
}

/// Delivery target for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: &Notification) {
        match n.severity {
            Severity::Info => info!(title = %n.title, "{}", n.body),
            Severity::Warning => warn!(title = %n.title, "{}", n.body),
        }
    }
}

/// Forward notifications for every received event until the channel closes.
///
/// Returns the number of notifications delivered. Lagged receivers skip the
/// events they missed and keep going.
pub async fn forward(mut events: broadcast::Receiver<Event>, notifier: &dyn Notifier) -> usize {
    let mut delivered = 0;
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Some(n) = Notification::from_event(&event) {
                    notifier.notify(&n);
                    delivered += 1;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "notification receiver lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::SubjectId;
    use chrono::Utc;
    use std::sync::Mutex;

    fn focus_done(topic: Option<&str>, priority: Option<Priority>) -> Event {
        Event::PhaseCompleted {
            completed: Phase::Focus,
            next: Phase::Break,
            completed_focus_sessions: 1,
            topic_id: topic.map(SubjectId::new),
            topic: topic.map(String::from),
            priority,
            at: Utc::now(),
        }
    }

    #[test]
    fn focus_completion_names_topic() {
        let n = Notification::from_event(&focus_done(Some("Algebra"), Some(Priority::Medium))).unwrap();
        assert_eq!(n.title, "Session complete!");
        assert_eq!(n.body, "Well done! You studied Algebra for 25 minutes.");
    }

    #[test]
    fn high_priority_adds_nudge() {
        let n = Notification::from_event(&focus_done(Some("Algebra"), Some(Priority::High))).unwrap();
        assert!(n.body.contains("high-priority"));
    }

    #[test]
    fn missing_topic_falls_back() {
        let n = Notification::from_event(&focus_done(None, None)).unwrap();
        assert!(n.body.contains("a subject"));
    }

    #[test]
    fn start_rejection_is_a_warning() {
        let ev = Event::StartRejected {
            reason: "no topic".into(),
            at: Utc::now(),
        };
        assert_eq!(Notification::from_event(&ev).unwrap().severity, Severity::Warning);
    }

    #[test]
    fn ordinary_events_are_silent() {
        let ev = Event::TopicCleared { at: Utc::now() };
        assert!(Notification::from_event(&ev).is_none());
    }

    #[derive(Default)]
    struct Collect(Mutex<Vec<Notification>>);

    impl Notifier for Collect {
        fn notify(&self, n: &Notification) {
            self.0.lock().unwrap().push(n.clone());
        }
    }

    #[tokio::test]
    async fn forward_stops_when_channel_closes() {
        let (tx, rx) = broadcast::channel(8);
        tx.send(focus_done(Some("Algebra"), None)).unwrap();
        tx.send(Event::TopicCleared { at: Utc::now() }).unwrap();
        drop(tx);

        let sink = Collect::default();
        assert_eq!(forward(rx, &sink).await, 1);
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn tracing_notifier_delivers_each_alert() {
        let (tx, rx) = broadcast::channel(8);
        tx.send(focus_done(Some("Algebra"), Some(Priority::High))).unwrap();
        tx.send(Event::StartRejected {
            reason: "no topic".into(),
            at: Utc::now(),
        })
        .unwrap();
        tx.send(Event::TopicCleared { at: Utc::now() }).unwrap();
        drop(tx);

        assert_eq!(forward(rx, &TracingNotifier).await, 2);
    }
}
