//! Study assistant capability.
//!
//! Summaries, mind maps and resource recommendations come from an injected
//! [`StudyAssistant`]. The timer and progress code never depend on it.
//! [`CannedAssistant`] is the offline implementation shipped with the crate.

mod canned;

pub use canned::{AssistantDelays, CannedAssistant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::subject::ColorTag;

#[async_trait]
pub trait StudyAssistant: Send + Sync {
    /// Condense `text` into a structured summary for `subject`.
    async fn summarize(&self, subject: &str, text: &str) -> Result<Summary>;

    /// Organise the concepts of `text` into a mind map rooted at `subject`.
    async fn mind_map(&self, subject: &str, text: &str) -> Result<MindMap>;

    /// Suggest study material for `subject`.
    async fn recommend(&self, subject: &str) -> Result<Vec<StudyResource>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub subject: String,
    pub key_points: Vec<String>,
    /// `(heading, explanation)` pairs.
    pub central_topics: Vec<(String, String)>,
    pub tip: String,
    /// Suggested review time range in minutes.
    pub review_minutes: (u32, u32),
    pub complexity: Difficulty,
}

impl Summary {
    /// Markdown rendering.
    pub fn render(&self) -> String {
        let mut out = format!("**Smart Summary - {}**\n\n**Key Points:**\n", self.subject);
        for p in &self.key_points {
            out.push_str(&format!("- {p}\n"));
        }
        out.push_str("\n**Central Topics:**\n");
        for (i, (head, body)) in self.central_topics.iter().enumerate() {
            out.push_str(&format!("{}. **{head}:** {body}\n", i + 1));
        }
        out.push_str(&format!(
            "\n**Study Tip:** {}\n\n**Review Time:** {}-{} minutes\n**Complexity:** {:?}\n",
            self.tip, self.review_minutes.0, self.review_minutes.1, self.complexity
        ));
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMapNode {
    pub id: String,
    pub text: String,
    pub level: u8,
    #[serde(default)]
    pub parent: Option<String>,
    pub color: ColorTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMap {
    pub nodes: Vec<MindMapNode>,
}

impl MindMap {
    pub fn root(&self) -> Option<&MindMapNode> {
        self.nodes.iter().find(|n| n.level == 0)
    }

    pub fn level(&self, level: u8) -> impl Iterator<Item = &MindMapNode> {
        self.nodes.iter().filter(move |n| n.level == level)
    }

    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a MindMapNode> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.parent.as_deref() == Some(id))
    }

    /// Indented outline, one node per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root() {
            self.write_outline(root, &mut out);
        }
        out
    }

    fn write_outline(&self, node: &MindMapNode, out: &mut String) {
        out.push_str(&"  ".repeat(node.level as usize));
        out.push_str(&node.text);
        out.push('\n');
        for child in self.children(&node.id) {
            self.write_outline(child, out);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Handout,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyResource {
    pub id: String,
    pub kind: ResourceKind,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub duration: Option<String>,
    pub rating: f32,
    pub url: String,
}
