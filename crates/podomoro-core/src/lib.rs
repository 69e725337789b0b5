//! # Podomoro Core Library
//!
//! This library provides the behavioral core of the Podomoro habit tracker and
//! pomodoro timer. Screens are thin rendering layers over the types exported
//! here: they read derived values and forward user intents back in.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A two-phase (focus/break) countdown state machine. The
//!   caller drives it by invoking `tick()` once per elapsed second.
//! - **Driver**: Owns an engine, applies user commands from a channel and
//!   awaits ticks from an injected [`TickSource`] only while running.
//! - **View**: Pure projection of engine state into a render description.
//! - **Habits**: In-memory habit list with change notifications, plus the
//!   daily/weekly statistics shown on the stats screen.
//! - **Storage**: TOML-based configuration.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerDriver`]: Tick/command loop around the engine
//! - [`TimerView`]: Render description for the timer screen
//! - [`HabitStore`]: Habit list with add/toggle/remove intents
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod habit;
pub mod storage;
pub mod timer;
pub mod view;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use habit::{
    Habit, HabitChange, HabitId, HabitObserver, HabitStats, HabitStore, HabitSummary,
    SubscriptionId,
};
pub use storage::Config;
pub use timer::{
    format_clock, Durations, IntervalTicks, ManualTicks, MinutesInput, Phase, TickSource,
    TimerCommand, TimerDriver, TimerEngine, TimerMode,
};
pub use view::{ModeOption, PrimaryAction, TimerView};
