use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::SubjectProgress;
use crate::subject::SubjectRegistry;

/// Hours studied against the target for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub day: Weekday,
    pub hours: f64,
    pub target_hours: f64,
}

impl DayEntry {
    pub fn new(day: Weekday, hours: f64, target_hours: f64) -> Self {
        Self {
            day,
            hours,
            target_hours,
        }
    }

    pub fn bar_status(&self) -> BarStatus {
        if self.hours >= self.target_hours {
            BarStatus::GoalMet
        } else if self.hours >= self.target_hours * 0.8 {
            BarStatus::GoodProgress
        } else {
            BarStatus::NeedsWork
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarStatus {
    GoalMet,
    GoodProgress,
    NeedsWork,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekRating {
    Excellent,
    GoodPace,
    CanImprove,
}

impl WeekRating {
    pub fn from_pct(pct: f64) -> Self {
        if pct >= 80.0 {
            WeekRating::Excellent
        } else if pct >= 60.0 {
            WeekRating::GoodPace
        } else {
            WeekRating::CanImprove
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeekRating::Excellent => "Excellent!",
            WeekRating::GoodPace => "Good pace",
            WeekRating::CanImprove => "Room to improve",
        }
    }
}

/// Seven-day bar chart data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekChart {
    pub days: Vec<DayEntry>,
    #[serde(default)]
    pub today: Option<Weekday>,
}

impl WeekChart {
    pub fn new(days: Vec<DayEntry>, today: Option<Weekday>) -> Self {
        Self { days, today }
    }

    /// Demo week used when no history exists.
    pub fn sample() -> Self {
        use Weekday::*;
        let hours = [2.5, 3.2, 1.8, 4.1, 2.9, 3.5, 2.2];
        let days = [Mon, Tue, Wed, Thu, Fri, Sat, Sun]
            .into_iter()
            .zip(hours)
            .map(|(day, h)| DayEntry::new(day, h, 3.0))
            .collect();
        Self::new(days, Some(Thu))
    }

    pub fn total_hours(&self) -> f64 {
        self.days.iter().map(|d| d.hours).sum()
    }

    pub fn target_hours(&self) -> f64 {
        self.days.iter().map(|d| d.target_hours).sum()
    }

    pub fn progress_pct(&self) -> f64 {
        let target = self.target_hours();
        if target == 0.0 {
            return 0.0;
        }
        self.total_hours() / target * 100.0
    }

    pub fn rating(&self) -> WeekRating {
        WeekRating::from_pct(self.progress_pct())
    }

    /// Upper bound of the chart axis: the tallest bar plus one hour.
    pub fn scale_max(&self) -> f64 {
        self.days
            .iter()
            .map(|d| d.hours.max(d.target_hours))
            .fold(0.0, f64::max)
            + 1.0
    }

    /// Bar heights as a percentage of [`scale_max`](Self::scale_max).
    pub fn bar_heights(&self) -> Vec<(f64, f64)> {
        let max = self.scale_max();
        self.days
            .iter()
            .map(|d| (d.hours / max * 100.0, d.target_hours / max * 100.0))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectBadge {
    High,
    Medium,
    Low,
}

impl SubjectBadge {
    pub fn from_pct(pct: f64) -> Self {
        if pct >= 80.0 {
            SubjectBadge::High
        } else if pct >= 50.0 {
            SubjectBadge::Medium
        } else {
            SubjectBadge::Low
        }
    }
}

/// Per-subject rows shown under the chart: the first three subjects in
/// registration order.
pub fn chart_subjects(registry: &SubjectRegistry) -> Vec<(SubjectProgress, SubjectBadge)> {
    registry
        .iter()
        .take(3)
        .map(|s| {
            let p = SubjectProgress::of(s);
            let badge = SubjectBadge::from_pct(p.pct);
            (p, badge)
        })
        .collect()
}
