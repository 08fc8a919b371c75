use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ColorTag, Priority, Subject, SubjectId};
use crate::error::ValidationError;

pub const MIN_TARGET_HOURS: u32 = 1;
pub const MAX_TARGET_HOURS: u32 = 20;
pub const DEFAULT_TARGET_HOURS: u32 = 3;

/// Read-only view of the subjects a timer may focus on.
pub trait TopicRegistry {
    /// All available topics, in registration order.
    fn topics(&self) -> Vec<&Subject>;

    fn get(&self, id: &SubjectId) -> Option<&Subject>;

    fn priority_of(&self, id: &SubjectId) -> Option<Priority> {
        self.get(id).map(|s| s.priority)
    }
}

/// Input for [`SubjectRegistry::add`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubject {
    pub name: String,
    #[serde(default)]
    pub color: ColorTag,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_target_hours")]
    pub target_hours: u32,
}

fn default_target_hours() -> u32 {
    DEFAULT_TARGET_HOURS
}

impl NewSubject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: ColorTag::default(),
            priority: Priority::default(),
            target_hours: DEFAULT_TARGET_HOURS,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn color(mut self, color: ColorTag) -> Self {
        self.color = color;
        self
    }

    pub fn target_hours(mut self, hours: u32) -> Self {
        self.target_hours = hours;
        self
    }
}

/// In-memory subject list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectRegistry {
    subjects: Vec<Subject>,
}

impl SubjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_subjects(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    /// Like [`from_subjects`](Self::from_subjects), but applies the checks
    /// [`add`](Self::add) does to every entry, and rejects repeated ids.
    pub fn validated(subjects: Vec<Subject>) -> Result<Self, ValidationError> {
        let target_range = MIN_TARGET_HOURS * 60..=MAX_TARGET_HOURS * 60;
        for (index, subject) in subjects.iter().enumerate() {
            if subject.name.trim().is_empty() {
                return Err(ValidationError::NameRequired);
            }
            if !target_range.contains(&subject.target_minutes) {
                return Err(ValidationError::TargetOutOfRange {
                    min: MIN_TARGET_HOURS,
                    max: MAX_TARGET_HOURS,
                    got: subject.target_minutes / 60,
                });
            }
            if subjects[..index].iter().any(|s| s.id == subject.id) {
                return Err(ValidationError::DuplicateSubject(subject.id.to_string()));
            }
        }
        Ok(Self::from_subjects(subjects))
    }

    /// Demo subjects shown on a fresh dashboard.
    pub fn seeded() -> Self {
        Self::from_subjects(vec![
            Subject {
                id: SubjectId::new("1"),
                name: "Mathematics".into(),
                color: ColorTag::Primary,
                priority: Priority::High,
                studied_minutes: 180,
                target_minutes: 300,
            },
            Subject {
                id: SubjectId::new("2"),
                name: "History".into(),
                color: ColorTag::Creative,
                priority: Priority::Medium,
                studied_minutes: 120,
                target_minutes: 200,
            },
            Subject {
                id: SubjectId::new("3"),
                name: "Literature".into(),
                color: ColorTag::Success,
                priority: Priority::High,
                studied_minutes: 90,
                target_minutes: 240,
            },
        ])
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter()
    }

    /// Register a new subject and return a reference to it.
    ///
    /// The name is trimmed and must not be empty; the weekly target must be
    /// within 1..=20 hours. On failure nothing is added.
    pub fn add(&mut self, new: NewSubject) -> Result<&Subject, ValidationError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if !(MIN_TARGET_HOURS..=MAX_TARGET_HOURS).contains(&new.target_hours) {
            return Err(ValidationError::TargetOutOfRange {
                min: MIN_TARGET_HOURS,
                max: MAX_TARGET_HOURS,
                got: new.target_hours,
            });
        }

        let subject = Subject {
            id: SubjectId::generate(),
            name: name.to_string(),
            color: new.color,
            priority: new.priority,
            studied_minutes: 0,
            target_minutes: new.target_hours * 60,
        };
        debug!(id = %subject.id, name = %subject.name, "subject added");
        self.subjects.push(subject);
        Ok(&self.subjects[self.subjects.len() - 1])
    }

    /// Subjects ordered High > Medium > Low, keeping registration order
    /// within a level.
    pub fn sorted_by_priority(&self) -> Vec<&Subject> {
        let mut sorted: Vec<&Subject> = self.subjects.iter().collect();
        sorted.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
        sorted
    }

    /// Case-insensitive lookup by display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Subject> {
        let needle = name.trim().to_lowercase();
        self.subjects
            .iter()
            .find(|s| s.name.to_lowercase() == needle)
    }

    pub fn first_high_priority(&self) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.priority == Priority::High)
    }

    pub fn count_with_priority(&self, priority: Priority) -> usize {
        self.subjects.iter().filter(|s| s.priority == priority).count()
    }

    /// Credit studied minutes to a subject.
    pub fn record_study(&mut self, id: &SubjectId, minutes: u32) -> Result<&Subject, ValidationError> {
        let subject = self
            .subjects
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| ValidationError::UnknownSubject(id.to_string()))?;
        subject.studied_minutes = subject.studied_minutes.saturating_add(minutes);
        debug!(id = %subject.id, minutes, total = subject.studied_minutes, "study time recorded");
        Ok(subject)
    }

    /// Sum of studied minutes across every subject.
    pub fn total_studied_minutes(&self) -> u32 {
        self.subjects.iter().map(|s| s.studied_minutes).sum()
    }
}

impl TopicRegistry for SubjectRegistry {
    fn topics(&self) -> Vec<&Subject> {
        self.subjects.iter().collect()
    }

    fn get(&self, id: &SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| &s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: &str, name: &str, target_minutes: u32) -> Subject {
        Subject {
            id: SubjectId::new(id),
            name: name.into(),
            color: ColorTag::Primary,
            priority: Priority::Medium,
            studied_minutes: 0,
            target_minutes,
        }
    }

    #[test]
    fn validated_accepts_seeded_subjects() {
        let seeded: Vec<Subject> = SubjectRegistry::seeded().iter().cloned().collect();
        assert_eq!(SubjectRegistry::validated(seeded).unwrap().len(), 3);
    }

    #[test]
    fn validated_rejects_what_add_rejects() {
        assert_eq!(
            SubjectRegistry::validated(vec![subject("a", "   ", 120)]).unwrap_err(),
            ValidationError::NameRequired
        );
        assert_eq!(
            SubjectRegistry::validated(vec![subject("a", "Art", 0)]).unwrap_err(),
            ValidationError::TargetOutOfRange { min: 1, max: 20, got: 0 }
        );
        assert!(SubjectRegistry::validated(vec![subject("a", "Art", 1260)]).is_err());
        assert_eq!(
            SubjectRegistry::validated(vec![subject("a", "Art", 120), subject("a", "Music", 120)])
                .unwrap_err(),
            ValidationError::DuplicateSubject("a".into())
        );
    }

    #[test]
    fn add_trims_name_and_converts_hours() {
        let mut reg = SubjectRegistry::new();
        let s = reg
            .add(NewSubject::named("  Physics ").target_hours(4))
            .unwrap();
        assert_eq!(s.name, "Physics");
        assert_eq!(s.target_minutes, 240);
        assert_eq!(s.studied_minutes, 0);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn add_rejects_blank_name() {
        let mut reg = SubjectRegistry::new();
        let err = reg.add(NewSubject::named("   ")).unwrap_err();
        assert_eq!(err, ValidationError::NameRequired);
        assert!(reg.is_empty());
    }

    #[test]
    fn add_rejects_target_out_of_range() {
        let mut reg = SubjectRegistry::new();
        assert!(reg.add(NewSubject::named("Art").target_hours(0)).is_err());
        assert!(reg.add(NewSubject::named("Art").target_hours(21)).is_err());
        assert!(reg.add(NewSubject::named("Art").target_hours(20)).is_ok());
    }

    #[test]
    fn sorted_by_priority_is_stable() {
        let mut reg = SubjectRegistry::new();
        reg.add(NewSubject::named("A").priority(Priority::Low)).unwrap();
        reg.add(NewSubject::named("B").priority(Priority::High)).unwrap();
        reg.add(NewSubject::named("C").priority(Priority::Medium)).unwrap();
        reg.add(NewSubject::named("D").priority(Priority::High)).unwrap();

        let names: Vec<&str> = reg
            .sorted_by_priority()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "D", "C", "A"]);
    }

    #[test]
    fn find_by_name_ignores_case() {
        let reg = SubjectRegistry::seeded();
        assert_eq!(reg.find_by_name("history").unwrap().id, SubjectId::new("2"));
        assert!(reg.find_by_name("Geography").is_none());
    }

    #[test]
    fn record_study_accumulates() {
        let mut reg = SubjectRegistry::seeded();
        let id = SubjectId::new("1");
        reg.record_study(&id, 25).unwrap();
        assert_eq!(reg.get(&id).unwrap().studied_minutes, 205);
        assert!(reg.record_study(&SubjectId::new("nope"), 25).is_err());
    }

    #[test]
    fn priority_of_reads_through_registry() {
        let reg = SubjectRegistry::seeded();
        assert_eq!(reg.priority_of(&SubjectId::new("2")), Some(Priority::Medium));
        assert_eq!(reg.priority_of(&SubjectId::new("9")), None);
        assert_eq!(reg.topics().len(), 3);
    }
}
