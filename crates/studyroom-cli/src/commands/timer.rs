use chrono::Utc;
use clap::Subcommand;
use studyroom_core::timer::FOCUS_SECS;
use studyroom_core::{Config, Event, Priority, SessionTimer, SubjectId, TopicRef};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer engine without waiting and print its events as JSON
    Simulate {
        /// Topic to study; looked up among saved subjects first
        #[arg(long)]
        topic: Option<String>,
        /// Number of one-second ticks to apply
        #[arg(long, default_value_t = FOCUS_SECS)]
        ticks: u32,
        /// Start the next phase automatically after each boundary
        #[arg(long)]
        auto_continue: bool,
    },
}

fn resolve_topic(name: &str) -> Result<TopicRef, Box<dyn std::error::Error>> {
    let registry = Config::load()?.registry();
    Ok(match registry.find_by_name(name) {
        Some(subject) => TopicRef::from(subject),
        None => TopicRef {
            id: SubjectId::generate(),
            name: name.trim().to_string(),
            priority: Priority::Medium,
        },
    })
}

/// Events a scripted run produces, ending with a state snapshot.
fn simulate(topic: Option<TopicRef>, ticks: u32, auto_continue: bool) -> Vec<Event> {
    let mut timer = SessionTimer::new();
    let mut events = Vec::new();

    if let Some(topic) = topic {
        // A fresh timer is in Focus, so selection cannot be refused.
        if let Ok(ev) = timer.select_topic(topic) {
            events.push(ev);
        }
    }
    match timer.start() {
        Ok(ev) => events.extend(ev),
        Err(e) => {
            events.push(Event::StartRejected {
                reason: e.to_string(),
                at: Utc::now(),
            });
            events.push(timer.snapshot());
            return events;
        }
    }

    for _ in 0..ticks {
        if let Some(ev) = timer.tick() {
            events.push(ev);
            if auto_continue {
                if let Ok(ev) = timer.start() {
                    events.extend(ev);
                }
            }
        }
    }
    events.push(timer.snapshot());
    events
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Simulate {
            topic,
            ticks,
            auto_continue,
        } => {
            let topic = topic.as_deref().map(resolve_topic).transpose()?;
            let events = simulate(topic, ticks, auto_continue);
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
    }
    Ok(())
}
