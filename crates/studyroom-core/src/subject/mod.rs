//! Subjects: the study areas a user tracks time against.
//!
//! Subjects are owned by whatever composes the application. The session
//! timer only ever reads them through [`TopicRegistry`].

mod registry;

pub use registry::{
    NewSubject, SubjectRegistry, TopicRegistry, DEFAULT_TARGET_HOURS, MAX_TARGET_HOURS,
    MIN_TARGET_HOURS,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque subject identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort weight; higher sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}' (expected high, medium or low)")),
        }
    }
}

/// Color tag used by front ends to label a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    #[default]
    Primary,
    Success,
    Creative,
    Energy,
}

impl std::str::FromStr for ColorTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "blue" => Ok(ColorTag::Primary),
            "success" | "green" => Ok(ColorTag::Success),
            "creative" | "purple" => Ok(ColorTag::Creative),
            "energy" | "orange" => Ok(ColorTag::Energy),
            other => Err(format!("unknown color '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub color: ColorTag,
    #[serde(default)]
    pub priority: Priority,
    /// Cumulative minutes studied.
    #[serde(default)]
    pub studied_minutes: u32,
    /// Weekly target in minutes.
    pub target_minutes: u32,
}

impl Subject {
    /// Share of the target reached, in percent. Zero when there is no target.
    pub fn progress_pct(&self) -> f64 {
        if self.target_minutes == 0 {
            return 0.0;
        }
        self.studied_minutes as f64 / self.target_minutes as f64 * 100.0
    }
}
