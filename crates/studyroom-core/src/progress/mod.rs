//! Derived progress figures for subjects and the week.
//!
//! Everything here is a pure function of the subject list (and, for the
//! chart, per-day totals); nothing is stored.

mod week;

pub use week::{chart_subjects, BarStatus, DayEntry, SubjectBadge, WeekChart, WeekRating};

use serde::{Deserialize, Serialize};

use crate::subject::{Priority, Subject, SubjectRegistry};

/// At or above this share of the target a subject is on track.
pub const ON_TRACK_PCT: f64 = 70.0;
/// Below this share of the target a subject needs attention.
pub const NEEDS_ATTENTION_PCT: f64 = 50.0;
/// Default weekly study goal across all subjects, in minutes.
pub const DEFAULT_WEEKLY_GOAL_MINUTES: u32 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectStatus {
    OnTrack,
    Steady,
    NeedsAttention,
}

impl SubjectStatus {
    pub fn from_pct(pct: f64) -> Self {
        if pct >= ON_TRACK_PCT {
            SubjectStatus::OnTrack
        } else if pct < NEEDS_ATTENTION_PCT {
            SubjectStatus::NeedsAttention
        } else {
            SubjectStatus::Steady
        }
    }
}

/// Minutes to hours, rounded to one decimal.
pub fn round_hours(minutes: u32) -> f64 {
    (f64::from(minutes) / 60.0 * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProgress {
    pub name: String,
    pub priority: Priority,
    pub studied_hours: f64,
    pub target_hours: f64,
    pub pct: f64,
    /// `pct` rounded for display.
    pub pct_rounded: u32,
    pub status: SubjectStatus,
}

impl SubjectProgress {
    pub fn of(subject: &Subject) -> Self {
        let pct = subject.progress_pct();
        Self {
            name: subject.name.clone(),
            priority: subject.priority,
            studied_hours: round_hours(subject.studied_minutes),
            target_hours: f64::from(subject.target_minutes) / 60.0,
            pct,
            pct_rounded: pct.round() as u32,
            status: SubjectStatus::from_pct(pct),
        }
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_studied_minutes: u32,
    pub weekly_goal_minutes: u32,
    pub weekly_progress_pct: f64,
    pub active_subjects: usize,
    pub high_priority_subjects: usize,
    /// Subjects in priority order.
    pub subjects: Vec<SubjectProgress>,
}

impl DashboardSummary {
    pub fn compute(registry: &SubjectRegistry, weekly_goal_minutes: u32) -> Self {
        let total = registry.total_studied_minutes();
        let weekly_progress_pct = if weekly_goal_minutes == 0 {
            0.0
        } else {
            f64::from(total) / f64::from(weekly_goal_minutes) * 100.0
        };
        Self {
            total_studied_minutes: total,
            weekly_goal_minutes,
            weekly_progress_pct,
            active_subjects: registry.len(),
            high_priority_subjects: registry.count_with_priority(Priority::High),
            subjects: registry
                .sorted_by_priority()
                .into_iter()
                .map(SubjectProgress::of)
                .collect(),
        }
    }

    pub fn needing_attention(&self) -> impl Iterator<Item = &SubjectProgress> {
        self.subjects
            .iter()
            .filter(|s| s.status == SubjectStatus::NeedsAttention)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_thresholds() {
        assert_eq!(SubjectStatus::from_pct(70.0), SubjectStatus::OnTrack);
        assert_eq!(SubjectStatus::from_pct(69.9), SubjectStatus::Steady);
        assert_eq!(SubjectStatus::from_pct(50.0), SubjectStatus::Steady);
        assert_eq!(SubjectStatus::from_pct(49.9), SubjectStatus::NeedsAttention);
    }

    #[test]
    fn hours_round_to_one_decimal() {
        assert_eq!(round_hours(90), 1.5);
        assert_eq!(round_hours(100), 1.7);
        assert_eq!(round_hours(0), 0.0);
    }

    #[test]
    fn seeded_dashboard() {
        let summary = DashboardSummary::compute(&SubjectRegistry::seeded(), DEFAULT_WEEKLY_GOAL_MINUTES);
        assert_eq!(summary.total_studied_minutes, 390);
        assert!((summary.weekly_progress_pct - 32.5).abs() < 1e-9);
        assert_eq!(summary.active_subjects, 3);
        assert_eq!(summary.high_priority_subjects, 2);

        let names: Vec<&str> = summary.subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Mathematics", "Literature", "History"]);

        // Mathematics 60%, Literature 37.5%, History 60%.
        assert_eq!(summary.subjects[0].status, SubjectStatus::Steady);
        assert_eq!(summary.subjects[1].status, SubjectStatus::NeedsAttention);
        assert_eq!(summary.subjects[1].pct_rounded, 38);
        assert_eq!(summary.needing_attention().count(), 1);
    }

    #[test]
    fn zero_goal_does_not_divide() {
        let summary = DashboardSummary::compute(&SubjectRegistry::seeded(), 0);
        assert_eq!(summary.weekly_progress_pct, 0.0);
    }
}
