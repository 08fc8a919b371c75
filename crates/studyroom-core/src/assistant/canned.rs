use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    Difficulty, MindMap, MindMapNode, ResourceKind, StudyAssistant, StudyResource, Summary,
};
use crate::error::{Result, ValidationError};
use crate::subject::ColorTag;

/// Simulated response latency per request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantDelays {
    #[serde(with = "millis")]
    pub summary: Duration,
    #[serde(with = "millis")]
    pub mind_map: Duration,
    #[serde(with = "millis")]
    pub recommendations: Duration,
}

impl Default for AssistantDelays {
    fn default() -> Self {
        Self {
            summary: Duration::from_millis(2000),
            mind_map: Duration::from_millis(1500),
            recommendations: Duration::from_millis(1000),
        }
    }
}

impl AssistantDelays {
    pub fn none() -> Self {
        Self {
            summary: Duration::ZERO,
            mind_map: Duration::ZERO,
            recommendations: Duration::ZERO,
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// Offline assistant returning fixed content after a fixed delay.
#[derive(Debug, Clone, Default)]
pub struct CannedAssistant {
    delays: AssistantDelays,
}

impl CannedAssistant {
    pub fn new(delays: AssistantDelays) -> Self {
        Self { delays }
    }

    /// No simulated latency.
    pub fn instant() -> Self {
        Self::new(AssistantDelays::none())
    }

    async fn wait(&self, d: Duration) {
        if !d.is_zero() {
            tokio::time::sleep(d).await;
        }
    }
}

fn require_text(text: &str, action: &'static str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ValidationError::TextRequired { action }.into());
    }
    Ok(())
}

#[async_trait]
impl StudyAssistant for CannedAssistant {
    async fn summarize(&self, subject: &str, text: &str) -> Result<Summary> {
        require_text(text, "summarize")?;
        debug!(subject, chars = text.len(), "generating summary");
        self.wait(self.delays.summary).await;

        Ok(Summary {
            subject: subject.to_string(),
            key_points: vec![
                "Fundamental concepts identified in the text".into(),
                "Relationships between the main topics".into(),
                "Practical examples mentioned".into(),
            ],
            central_topics: vec![
                ("Fundamentals".into(), "Theoretical basis of the content".into()),
                ("Applications".into(), "How to apply it in practice".into()),
                ("Exercises".into(), "Suggested practice".into()),
            ],
            tip: "Focus on the highlighted concepts and practice with similar exercises to lock in what you learned.".into(),
            review_minutes: (15, 20),
            complexity: Difficulty::Intermediate,
        })
    }

    async fn mind_map(&self, subject: &str, text: &str) -> Result<MindMap> {
        require_text(text, "map")?;
        debug!(subject, "generating mind map");
        self.wait(self.delays.mind_map).await;

        let node = |id: &str, label: &str, level: u8, parent: Option<&str>, color: ColorTag| MindMapNode {
            id: id.into(),
            text: label.into(),
            level,
            parent: parent.map(String::from),
            color,
        };
        Ok(MindMap {
            nodes: vec![
                node("1", subject, 0, None, ColorTag::Primary),
                node("2", "Core Concepts", 1, Some("1"), ColorTag::Success),
                node("3", "Key Formulas", 1, Some("1"), ColorTag::Creative),
                node("4", "Practical Applications", 1, Some("1"), ColorTag::Energy),
                node("5", "Definitions", 2, Some("2"), ColorTag::Success),
                node("6", "Properties", 2, Some("2"), ColorTag::Success),
                node("7", "Equations", 2, Some("3"), ColorTag::Creative),
                node("8", "Theorems", 2, Some("3"), ColorTag::Creative),
                node("9", "Exercises", 2, Some("4"), ColorTag::Energy),
                node("10", "Projects", 2, Some("4"), ColorTag::Energy),
            ],
        })
    }

    async fn recommend(&self, subject: &str) -> Result<Vec<StudyResource>> {
        debug!(subject, "generating recommendations");
        self.wait(self.delays.recommendations).await;

        Ok(vec![
            StudyResource {
                id: "1".into(),
                kind: ResourceKind::Handout,
                title: format!("Complete {subject} Handbook"),
                description: "Comprehensive material with theory and worked exercises".into(),
                difficulty: Difficulty::Intermediate,
                duration: None,
                rating: 4.8,
                url: "#".into(),
            },
            StudyResource {
                id: "2".into(),
                kind: ResourceKind::Video,
                title: format!("{subject} - Interactive Lesson"),
                description: "Dynamic video lesson with practical examples and exercises".into(),
                difficulty: Difficulty::Beginner,
                duration: Some("45 min".into()),
                rating: 4.9,
                url: "#".into(),
            },
            StudyResource {
                id: "3".into(),
                kind: ResourceKind::Handout,
                title: "Solved and Annotated Exercises".into(),
                description: "Exercise collection with step-by-step solutions".into(),
                difficulty: Difficulty::Advanced,
                duration: None,
                rating: 4.7,
                url: "#".into(),
            },
            StudyResource {
                id: "4".into(),
                kind: ResourceKind::Video,
                title: "Advanced Masterclass".into(),
                description: "In-depth content for students who want to stand out".into(),
                difficulty: Difficulty::Advanced,
                duration: Some("1h 20min".into()),
                rating: 4.9,
                url: "#".into(),
            },
        ])
    }
}
