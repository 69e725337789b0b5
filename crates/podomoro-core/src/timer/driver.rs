//! Tick/command loop around a [`TimerEngine`].
//!
//! The engine has no notion of wall-clock time. The driver owns it, applies
//! user commands as they arrive and awaits the injected [`TickSource`] only
//! while the engine is running, so stopping the timer stops the ticks.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use super::engine::TimerEngine;
use super::mode::TimerMode;
use crate::events::Event;

/// One engine tick per second of wall-clock time.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const COMMAND_BUFFER: usize = 32;

/// Source of one-second ticks.
pub trait TickSource {
    /// Re-arm so the next tick lands one full period from now.
    fn restart(&mut self);

    /// Resolves when the next tick is due. `false` means the source is
    /// exhausted and the drive loop should end.
    fn next_tick(&mut self) -> impl Future<Output = bool> + Send;
}

/// Real-time ticks from a tokio interval.
#[derive(Debug)]
pub struct IntervalTicks {
    interval: Interval,
}

impl IntervalTicks {
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl Default for IntervalTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for IntervalTicks {
    fn restart(&mut self) {
        self.interval.reset();
    }

    fn next_tick(&mut self) -> impl Future<Output = bool> + Send {
        async move {
            self.interval.tick().await;
            true
        }
    }
}

/// Ticks that are due immediately, optionally up to a fixed budget.
///
/// Used for simulation and tests: a full 50 minute focus phase runs in
/// microseconds.
#[derive(Debug, Clone, Default)]
pub struct ManualTicks {
    budget: Option<u64>,
    delivered: u64,
}

impl ManualTicks {
    /// Deliver exactly `budget` ticks, then report exhaustion.
    pub fn new(budget: u64) -> Self {
        Self {
            budget: Some(budget),
            delivered: 0,
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}

impl TickSource for ManualTicks {
    fn restart(&mut self) {}

    fn next_tick(&mut self) -> impl Future<Output = bool> + Send {
        async move {
            if self.budget.is_some_and(|budget| self.delivered >= budget) {
                return false;
            }
            // Give command senders on the same runtime a chance to run.
            tokio::task::yield_now().await;
            self.delivered += 1;
            true
        }
    }
}

/// User intents forwarded by a rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    Toggle,
    Reset,
    SelectMode(TimerMode),
    SetCustomFocus(String),
    SetCustomBreak(String),
    Shutdown,
}

enum Wake {
    Command(Option<TimerCommand>),
    Tick(bool),
}

/// Owns a [`TimerEngine`] and drives it from commands and ticks.
pub struct TimerDriver<T> {
    engine: TimerEngine,
    ticks: T,
    commands: mpsc::Receiver<TimerCommand>,
}

impl<T: TickSource> TimerDriver<T> {
    /// Returns the driver and the sender used to feed it commands.
    pub fn new(engine: TimerEngine, ticks: T) -> (Self, mpsc::Sender<TimerCommand>) {
        let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
        (
            Self {
                engine,
                ticks,
                commands,
            },
            tx,
        )
    }

    /// Run until shut down, returning the final engine.
    ///
    /// `on_update` sees the engine after every applied command and every
    /// tick, together with the event it produced, if any. The loop ends on
    /// [`TimerCommand::Shutdown`], when the tick source is exhausted, or when
    /// the command channel is closed and the engine is idle.
    pub async fn run<F>(mut self, mut on_update: F) -> TimerEngine
    where
        F: FnMut(&TimerEngine, Option<&Event>),
    {
        let mut commands_open = true;
        loop {
            let wake = match (self.engine.is_running(), commands_open) {
                (true, true) => {
                    tokio::select! {
                        biased;
                        command = self.commands.recv() => Wake::Command(command),
                        alive = self.ticks.next_tick() => Wake::Tick(alive),
                    }
                }
                (true, false) => Wake::Tick(self.ticks.next_tick().await),
                (false, true) => Wake::Command(self.commands.recv().await),
                (false, false) => break,
            };

            match wake {
                Wake::Command(Some(TimerCommand::Shutdown)) => {
                    debug!("timer driver shutting down");
                    break;
                }
                Wake::Command(Some(command)) => self.apply(command, &mut on_update),
                Wake::Command(None) => {
                    debug!("command channel closed");
                    commands_open = false;
                }
                Wake::Tick(true) => {
                    let event = self.engine.tick();
                    on_update(&self.engine, event.as_ref());
                }
                Wake::Tick(false) => {
                    info!("tick source exhausted");
                    break;
                }
            }
        }
        self.engine
    }

    fn apply<F>(&mut self, command: TimerCommand, on_update: &mut F)
    where
        F: FnMut(&TimerEngine, Option<&Event>),
    {
        let was_running = self.engine.is_running();
        let event = match command {
            TimerCommand::Start => self.engine.start(),
            TimerCommand::Pause => self.engine.pause(),
            TimerCommand::Toggle => self.engine.toggle(),
            TimerCommand::Reset => self.engine.reset(),
            TimerCommand::SelectMode(mode) => self.engine.select_mode(mode),
            TimerCommand::SetCustomFocus(text) => self.engine.set_custom_focus_input(&text),
            TimerCommand::SetCustomBreak(text) => self.engine.set_custom_break_input(&text),
            TimerCommand::Shutdown => None,
        };
        if !was_running && self.engine.is_running() {
            self.ticks.restart();
        }
        on_update(&self.engine, event.as_ref());
    }
}
