//! Daily study plan suggested from the subject list.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::subject::{ColorTag, Priority, SubjectId, SubjectRegistry};

/// Afternoon/evening start times, in order of assignment.
const SLOT_TIMES: [(u32, u32); 5] = [(14, 0), (15, 30), (17, 0), (19, 0), (20, 30)];
const FALLBACK_SLOT: (u32, u32) = (21, 0);
/// Subjects beyond this many are not scheduled.
pub const MAX_PLAN_ITEMS: usize = 5;
/// Length of the window in which a slot counts as "now".
pub const SLOT_WINDOW_MIN: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Study,
    Review,
    Practice,
}

impl SessionKind {
    const ROTATION: [SessionKind; 3] = [SessionKind::Study, SessionKind::Review, SessionKind::Practice];

    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Study => "Study",
            SessionKind::Review => "Review",
            SessionKind::Practice => "Practice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Past,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    pub id: String,
    pub subject_id: SubjectId,
    pub subject: String,
    pub start: NaiveTime,
    pub duration_min: u32,
    pub kind: SessionKind,
    pub color: ColorTag,
}

impl PlanItem {
    pub fn status_at(&self, now: NaiveTime) -> SlotStatus {
        let start = minutes_of_day(self.start);
        let now = minutes_of_day(now);
        if now >= start + SLOT_WINDOW_MIN {
            SlotStatus::Past
        } else if now >= start {
            SlotStatus::Current
        } else {
            SlotStatus::Upcoming
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub items: Vec<PlanItem>,
    /// Subject suggested for tomorrow morning.
    pub tomorrow_focus: Option<String>,
}

impl DailyPlan {
    /// Lay the first five subjects onto today's slots.
    ///
    /// High-priority subjects get 50 minutes, the rest 40. Session kinds
    /// rotate study, review, practice.
    pub fn generate(registry: &SubjectRegistry) -> Self {
        let mut items: Vec<PlanItem> = registry
            .iter()
            .take(MAX_PLAN_ITEMS)
            .enumerate()
            .map(|(index, subject)| {
                let (h, m) = SLOT_TIMES.get(index).copied().unwrap_or(FALLBACK_SLOT);
                PlanItem {
                    id: format!("{}-{index}", subject.id),
                    subject_id: subject.id.clone(),
                    subject: subject.name.clone(),
                    start: NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN),
                    duration_min: if subject.priority == Priority::High { 50 } else { 40 },
                    kind: SessionKind::ROTATION[index % SessionKind::ROTATION.len()],
                    color: subject.color,
                }
            })
            .collect();
        items.sort_by_key(|item| item.start);

        Self {
            items,
            tomorrow_focus: registry.first_high_priority().map(|s| s.name.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The slot in progress at `now`, if any.
    pub fn current(&self, now: NaiveTime) -> Option<&PlanItem> {
        self.items
            .iter()
            .find(|item| item.status_at(now) == SlotStatus::Current)
    }
}

/// Parse a `HH:MM` wall-clock time.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(s.to_string()))
}

fn minutes_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}
