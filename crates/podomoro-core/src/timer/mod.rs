mod driver;
mod engine;
mod mode;
mod phase;

pub use driver::{IntervalTicks, ManualTicks, TickSource, TimerCommand, TimerDriver, TICK_PERIOD};
pub use engine::{format_clock, TimerEngine};
pub use mode::{parse_minutes, Durations, MinutesInput, TimerMode, MAX_INPUT_DIGITS, MAX_MINUTES};
pub use phase::Phase;
