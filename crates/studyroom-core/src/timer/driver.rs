//! Async driver for [`SessionTimer`].
//!
//! One tokio task owns the timer. Callers talk to it through a cloneable
//! [`TimerHandle`]; every event the timer produces is fanned out on a
//! broadcast channel.
//!
//! The tick interval only exists while the timer is running. Any command or
//! tick that leaves the timer stopped drops the interval, so nothing can
//! decrement the countdown after a pause, a reset, or a phase boundary.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace};

use super::engine::{SessionTimer, TopicRef};
use crate::error::{CoreError, DriverError, ValidationError};
use crate::events::Event;

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Wall-clock time per timer second. One second in production.
    pub tick_period: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
        }
    }
}

enum Command {
    Start(oneshot::Sender<Result<(), ValidationError>>),
    Pause,
    Reset,
    SelectTopic(TopicRef, oneshot::Sender<Result<(), ValidationError>>),
    ClearTopic(oneshot::Sender<Result<(), ValidationError>>),
    State(oneshot::Sender<SessionTimer>),
    Shutdown,
}

/// Cloneable control handle for a running driver.
#[derive(Clone)]
pub struct TimerHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<Event>,
}

impl TimerHandle {
    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub async fn start(&self) -> Result<(), CoreError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Start(tx)).await?;
        rx.await.map_err(DriverError::from)??;
        Ok(())
    }

    pub async fn pause(&self) -> Result<(), DriverError> {
        self.send(Command::Pause).await
    }

    pub async fn reset(&self) -> Result<(), DriverError> {
        self.send(Command::Reset).await
    }

    pub async fn select_topic(&self, topic: TopicRef) -> Result<(), CoreError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::SelectTopic(topic, tx)).await?;
        rx.await.map_err(DriverError::from)??;
        Ok(())
    }

    pub async fn clear_topic(&self) -> Result<(), CoreError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::ClearTopic(tx)).await?;
        rx.await.map_err(DriverError::from)??;
        Ok(())
    }

    /// Copy of the current timer state.
    pub async fn state(&self) -> Result<SessionTimer, DriverError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::State(tx)).await?;
        Ok(rx.await?)
    }

    /// Ask the driver task to stop. It returns the final timer state through
    /// its join handle.
    pub async fn shutdown(&self) -> Result<(), DriverError> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, cmd: Command) -> Result<(), DriverError> {
        self.commands.send(cmd).await.map_err(DriverError::from)
    }
}

/// Spawn the driver task on the current tokio runtime.
///
/// The task ends on [`TimerHandle::shutdown`] or once every handle is
/// dropped, yielding the final timer state.
pub fn spawn(timer: SessionTimer, config: DriverConfig) -> (TimerHandle, JoinHandle<SessionTimer>) {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let (event_tx, _) = broadcast::channel(EVENT_BUFFER);
    let handle = TimerHandle {
        commands: cmd_tx,
        events: event_tx.clone(),
    };
    let task = tokio::spawn(run(timer, config, cmd_rx, event_tx));
    (handle, task)
}

async fn run(
    mut timer: SessionTimer,
    config: DriverConfig,
    mut commands: mpsc::Receiver<Command>,
    events: broadcast::Sender<Event>,
) -> SessionTimer {
    let period_ms = config.tick_period.as_millis() as u64;
    debug!(period_ms, "timer driver started");
    let mut ticker: Option<Interval> = None;
    sync_ticker(&mut ticker, &timer, config.tick_period);

    loop {
        tokio::select! {
            cmd = commands.recv() => {
                let Some(cmd) = cmd else { break };
                match cmd {
                    Command::Start(reply) => {
                        let result = match timer.start() {
                            Ok(ev) => {
                                if let Some(ev) = ev {
                                    publish(&events, ev);
                                }
                                Ok(())
                            }
                            Err(e) => {
                                publish(&events, Event::StartRejected {
                                    reason: e.to_string(),
                                    at: chrono::Utc::now(),
                                });
                                Err(e)
                            }
                        };
                        let _ = reply.send(result);
                    }
                    Command::Pause => {
                        if let Some(ev) = timer.pause() {
                            publish(&events, ev);
                        }
                    }
                    Command::Reset => publish(&events, timer.reset()),
                    Command::SelectTopic(topic, reply) => {
                        let result = timer.select_topic(topic).map(|ev| publish(&events, ev));
                        let _ = reply.send(result);
                    }
                    Command::ClearTopic(reply) => {
                        let result = timer.clear_topic().map(|ev| publish(&events, ev));
                        let _ = reply.send(result);
                    }
                    Command::State(reply) => {
                        let _ = reply.send(timer.clone());
                    }
                    Command::Shutdown => break,
                }
            }
            _ = next_tick(&mut ticker) => {
                trace!(remaining = timer.remaining_secs(), "tick");
                if let Some(ev) = timer.tick() {
                    publish(&events, ev);
                }
            }
        }

        sync_ticker(&mut ticker, &timer, config.tick_period);
    }

    debug!("timer driver stopped");
    timer
}

/// Create the interval when the timer starts running, drop it as soon as it
/// stops.
fn sync_ticker(ticker: &mut Option<Interval>, timer: &SessionTimer, period: Duration) {
    match (timer.is_running(), ticker.is_some()) {
        (true, false) => {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            *ticker = Some(interval);
        }
        (false, true) => *ticker = None,
        _ => {}
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

fn publish(events: &broadcast::Sender<Event>, event: Event) {
    // No subscribers is fine: the event is simply dropped.
    let _ = events.send(event);
}
