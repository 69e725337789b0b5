use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimerMode};

/// Every state change of the timer produces an Event.
/// Rendering layers either poll `snapshot()` or react to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    ModeSelected {
        mode: TimerMode,
        focus_minutes: u32,
        break_minutes: u32,
        at: DateTime<Utc>,
    },
    /// One of the custom duration inputs was edited.
    /// `restarted` is set when the edit changed the effective minutes.
    CustomInputChanged {
        input: Phase,
        value: String,
        restarted: bool,
        at: DateTime<Utc>,
    },
    /// A phase ran out and the next one began.
    PhaseChanged {
        from: Phase,
        to: Phase,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// A phase ran out but the next one has zero length, so the timer stopped.
    TimerHalted {
        phase: Phase,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        phase: Phase,
        is_running: bool,
        remaining_secs: u32,
        total_secs: u32,
        progress: f64,
        clock_text: String,
        focus_minutes: u32,
        break_minutes: u32,
        is_config_valid: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name of the variant, used for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerReset { .. } => "timer_reset",
            Event::ModeSelected { .. } => "mode_selected",
            Event::CustomInputChanged { .. } => "custom_input_changed",
            Event::PhaseChanged { .. } => "phase_changed",
            Event::TimerHalted { .. } => "timer_halted",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
