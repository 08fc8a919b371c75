//! Interactive study session.
//!
//! The timer runs live on the driver task while commands are read from
//! stdin. Timer events and their notifications print as they arrive.

use std::time::Duration;

use studyroom_core::timer::driver;
use studyroom_core::{
    Config, CoreError, DriverConfig, Event, NewSubject, Notification, Notifier, Phase, Priority,
    SessionTimer, SubjectId, SubjectRegistry, TimerHandle, TopicRef, ValidationError,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

const HELP: &str = "\
commands:
  subjects                          list subjects
  add <name> [priority] [hours]     add a subject for this session
  select <name>                     choose what to study
  clear                             clear the selected subject
  start | pause | reset             control the timer
  status                            show the timer
  quit                              end the session";

/// Prints notifications to stdout.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, n: &Notification) {
        println!(">> {}: {}", n.title, n.body);
    }
}

struct Session {
    registry: SubjectRegistry,
    timer: TimerHandle,
    default_target_hours: u32,
    notifications: bool,
}

pub fn run(tick_ms: u64) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let tick_period = Duration::from_millis(tick_ms.max(1));
    super::block_on(repl(config, tick_period))?
}

async fn repl(config: Config, tick_period: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let (timer, task) = driver::spawn(SessionTimer::new(), DriverConfig { tick_period });
    let mut events = timer.subscribe();
    let mut session = Session {
        registry: config.registry(),
        timer,
        default_target_hours: config.goals.default_target_hours,
        notifications: config.notifications.enabled,
    };

    println!("Studyroom session. Type `help` for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !session.command(line.trim()).await? {
                    break;
                }
            }
            event = events.recv() => match event {
                Ok(event) => session.on_event(&event),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "session fell behind timer events"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    session.timer.shutdown().await?;
    let final_state = task.await?;
    println!(
        "Session over: {} focus session(s) completed.",
        final_state.completed_focus_sessions()
    );
    Ok(())
}

impl Session {
    /// Handle one input line. Returns `false` when the session should end.
    async fn command(&mut self, line: &str) -> Result<bool, CoreError> {
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        debug!(cmd, "session command");

        let outcome = match cmd {
            "" => Ok(()),
            "help" => {
                println!("{HELP}");
                Ok(())
            }
            "subjects" => {
                self.list_subjects();
                Ok(())
            }
            "add" => self.add_subject(rest),
            "select" => self.select(rest).await,
            "clear" => self.timer.clear_topic().await,
            "start" => self.timer.start().await,
            "pause" => self.timer.pause().await.map_err(CoreError::from),
            "reset" => self.timer.reset().await.map_err(CoreError::from),
            "status" => self.status().await,
            "quit" | "exit" => return Ok(false),
            other => {
                println!("unknown command `{other}`; type `help`");
                Ok(())
            }
        };

        match outcome {
            Ok(()) => Ok(true),
            // Rejected input leaves the session as it was.
            Err(CoreError::Validation(e)) => {
                println!("warning: {e}");
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    fn list_subjects(&self) {
        if self.registry.is_empty() {
            println!("no subjects; add one with `add <name>`");
        }
        for s in self.registry.sorted_by_priority() {
            println!(
                "  {:<24} {:<6} {}/{} min",
                s.name,
                s.priority.label(),
                s.studied_minutes,
                s.target_minutes
            );
        }
    }

    /// `add <name> [priority] [hours]`; trailing words that parse as a
    /// target or a priority are taken as such.
    fn add_subject(&mut self, args: &str) -> Result<(), CoreError> {
        let mut words: Vec<&str> = args.split_whitespace().collect();
        let mut hours = self.default_target_hours;
        let mut priority = Priority::Medium;

        if words.len() > 1 {
            if let Some(h) = words.last().and_then(|w| w.parse::<u32>().ok()) {
                hours = h;
                words.pop();
            }
        }
        if words.len() > 1 {
            if let Some(p) = words.last().and_then(|w| w.parse::<Priority>().ok()) {
                priority = p;
                words.pop();
            }
        }

        let added = self.registry.add(
            NewSubject::named(words.join(" "))
                .priority(priority)
                .target_hours(hours),
        )?;
        println!(
            "added {} ({}, {} h/week)",
            added.name,
            added.priority.label(),
            added.target_minutes / 60
        );
        Ok(())
    }

    async fn select(&mut self, name: &str) -> Result<(), CoreError> {
        let Some(subject) = self.registry.find_by_name(name) else {
            println!("no subject named `{name}`");
            return Ok(());
        };
        self.timer.select_topic(TopicRef::from(subject)).await
    }

    async fn status(&self) -> Result<(), CoreError> {
        let state = self.timer.state().await?;
        let (done, cycle) = state.cycle_position();
        let topic = state
            .selected_topic()
            .map_or("no subject", |t| t.name.as_str());
        println!(
            "{} {} [{}] {:.0}% | session {}/{} | {topic}",
            state.phase().label(),
            state.display(),
            if state.is_running() { "running" } else { "paused" },
            state.progress_pct(),
            done,
            cycle
        );
        Ok(())
    }

    fn on_event(&mut self, event: &Event) {
        match event {
            Event::TimerStarted { phase, remaining_secs, .. } => {
                println!("{} started ({}s left)", phase.label(), remaining_secs);
            }
            Event::TimerPaused { .. } => println!("paused"),
            Event::TimerReset { phase, .. } => println!("{} reset", phase.label()),
            Event::TopicSelected { topic, .. } => println!("studying {}", topic.name),
            Event::TopicCleared { .. } => println!("subject cleared"),
            _ => {}
        }
        if let Err(e) = credit_focus(&mut self.registry, event) {
            warn!(error = %e, "could not record study time");
        }

        if self.notifications {
            if let Some(n) = session_notification(event) {
                ConsoleNotifier.notify(&n);
            }
        }
    }
}

/// Credit a completed focus phase to the subject it was studied for.
/// Returns the credited subject's id, if any.
fn credit_focus(
    registry: &mut SubjectRegistry,
    event: &Event,
) -> Result<Option<SubjectId>, ValidationError> {
    let Event::PhaseCompleted {
        completed: Phase::Focus,
        topic_id: Some(id),
        ..
    } = event
    else {
        return Ok(None);
    };
    registry.record_study(id, Phase::Focus.duration_secs() / 60)?;
    Ok(Some(id.clone()))
}

/// Alerts worth printing in the session. A refused start is already
/// reported by the command that caused it.
fn session_notification(event: &Event) -> Option<Notification> {
    match event {
        Event::StartRejected { .. } => None,
        other => Notification::from_event(other),
    }
}
