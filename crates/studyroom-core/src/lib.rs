//! # Studyroom Core Library
//!
//! Business logic for the Studyroom study planner. Front ends (the bundled
//! CLI, or anything else) compose these pieces and own all state.
//!
//! ## Architecture
//!
//! - **Session Timer**: a tick-driven Focus/Break state machine, plus an
//!   async driver that ticks it once per second on a tokio task
//! - **Subjects**: study areas with priority and weekly target
//! - **Progress / Plan**: pure derivations over the subject list
//! - **Assistant**: injectable summary / mind map / recommendation capability
//! - **Storage**: TOML configuration
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: Core timer state machine
//! - [`TimerHandle`]: Control handle for the running driver
//! - [`SubjectRegistry`]: In-memory subject list
//! - [`StudyAssistant`]: Trait for assistant implementations
//! - [`Config`]: Application configuration management

pub mod assistant;
pub mod error;
pub mod events;
pub mod notify;
pub mod plan;
pub mod progress;
pub mod storage;
pub mod subject;
pub mod timer;

pub use assistant::{CannedAssistant, MindMap, StudyAssistant, StudyResource, Summary};
pub use error::{ConfigError, CoreError, DriverError, ValidationError};
pub use events::Event;
pub use notify::{Notification, Notifier, Severity, TracingNotifier};
pub use plan::{DailyPlan, PlanItem, SessionKind, SlotStatus};
pub use progress::{DashboardSummary, SubjectProgress, SubjectStatus, WeekChart};
pub use storage::Config;
pub use subject::{ColorTag, NewSubject, Priority, Subject, SubjectId, SubjectRegistry, TopicRegistry};
pub use timer::{DriverConfig, Phase, SessionTimer, TimerHandle, TopicRef};
