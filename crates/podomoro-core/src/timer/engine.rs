//! Timer engine implementation.
//!
//! The engine is a two-phase countdown. It does not use internal threads or
//! clocks - the caller is responsible for calling `tick()` once per elapsed
//! second while the timer is running (see [`super::TimerDriver`]).
//!
//! ## State Transitions
//!
//! ```text
//! Idle(phase, remaining) --start--> Running(phase, remaining)
//! Running --pause--> Idle
//! Running --tick--> Running            (countdown, or rollover to next phase)
//! Running --tick--> Idle               (rollover into a zero-length phase)
//! any --reset | mode change--> Idle(Focus, focus length)
//! ```
//!
//! ## Usage
//!
//! ```
//! use podomoro_core::{Phase, TimerEngine, TimerMode};
//!
//! let mut engine = TimerEngine::with_mode(TimerMode::ThirtyFive);
//! engine.start();
//! for _ in 0..30 * 60 {
//!     engine.tick();
//! }
//! assert_eq!(engine.phase(), Phase::Break);
//! assert_eq!(engine.remaining_secs(), 5 * 60);
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::mode::{Durations, MinutesInput, TimerMode};
use super::phase::Phase;
use crate::events::Event;

const DEFAULT_CUSTOM_FOCUS: &str = "50";
const DEFAULT_CUSTOM_BREAK: &str = "10";

/// Core timer engine.
///
/// Every command returns `Some(Event)` when it changed state and `None` when
/// it was a no-op. Invalid configuration never produces an error; it only
/// blocks `start()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    mode: TimerMode,
    custom_focus: MinutesInput,
    custom_break: MinutesInput,
    phase: Phase,
    remaining_secs: u32,
    running: bool,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    /// Create an idle engine on the 50/10 preset with the focus phase loaded.
    pub fn new() -> Self {
        Self::with_mode(TimerMode::default())
    }

    pub fn with_mode(mode: TimerMode) -> Self {
        Self::with_custom_inputs(mode, DEFAULT_CUSTOM_FOCUS, DEFAULT_CUSTOM_BREAK)
    }

    /// Create an idle engine with pre-filled custom inputs.
    ///
    /// The inputs are sanitized the same way edits are.
    pub fn with_custom_inputs(mode: TimerMode, focus_input: &str, break_input: &str) -> Self {
        let mut engine = Self {
            mode,
            custom_focus: MinutesInput::sanitize(focus_input),
            custom_break: MinutesInput::sanitize(break_input),
            phase: Phase::Focus,
            remaining_secs: 0,
            running: false,
        };
        engine.remaining_secs = engine.durations().secs_for(Phase::Focus);
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn custom_focus_input(&self) -> &str {
        self.custom_focus.as_str()
    }

    pub fn custom_break_input(&self) -> &str {
        self.custom_break.as_str()
    }

    /// Effective focus/break minutes for the selected mode.
    pub fn durations(&self) -> Durations {
        self.mode.durations(&self.custom_focus, &self.custom_break)
    }

    pub fn focus_minutes(&self) -> u32 {
        self.durations().focus_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.durations().break_minutes
    }

    pub fn is_config_valid(&self) -> bool {
        self.durations().is_valid()
    }

    /// Full length of the current phase in seconds.
    pub fn total_secs(&self) -> u32 {
        self.durations().secs_for(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - f64::from(self.remaining_secs) / f64::from(total)).clamp(0.0, 1.0)
    }

    /// Remaining time as `MM:SS`.
    pub fn clock_text(&self) -> String {
        format_clock(self.remaining_secs)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let durations = self.durations();
        Event::StateSnapshot {
            mode: self.mode,
            phase: self.phase,
            is_running: self.running,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            progress: self.progress(),
            clock_text: self.clock_text(),
            focus_minutes: durations.focus_minutes,
            break_minutes: durations.break_minutes,
            is_config_valid: durations.is_valid(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch to another mode. Selecting the current mode is a no-op;
    /// anything else stops the run and reloads the focus phase.
    pub fn select_mode(&mut self, mode: TimerMode) -> Option<Event> {
        if self.mode == mode {
            return None;
        }
        self.mode = mode;
        self.restart_focus();
        let durations = self.durations();
        info!(
            mode = mode.name(),
            focus_minutes = durations.focus_minutes,
            break_minutes = durations.break_minutes,
            "timer mode selected"
        );
        Some(Event::ModeSelected {
            mode,
            focus_minutes: durations.focus_minutes,
            break_minutes: durations.break_minutes,
            at: Utc::now(),
        })
    }

    pub fn set_custom_focus_input(&mut self, text: &str) -> Option<Event> {
        self.set_custom_input(Phase::Focus, text)
    }

    pub fn set_custom_break_input(&mut self, text: &str) -> Option<Event> {
        self.set_custom_input(Phase::Break, text)
    }

    /// Start counting down. Ignored while running or when either duration
    /// is zero; a finished countdown is reloaded with the focus phase first.
    pub fn start(&mut self) -> Option<Event> {
        if !self.is_config_valid() {
            debug!("start ignored: focus and break must both be at least one minute");
            return None;
        }
        if self.running {
            return None;
        }
        if self.remaining_secs == 0 {
            self.phase = Phase::Focus;
            self.remaining_secs = self.durations().secs_for(Phase::Focus);
        }
        self.running = true;
        info!(
            phase = self.phase.name(),
            remaining_secs = self.remaining_secs,
            "timer started"
        );
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop counting down, keeping phase and remaining time for a later start.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        info!(
            phase = self.phase.name(),
            remaining_secs = self.remaining_secs,
            "timer paused"
        );
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Start when stopped, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.restart_focus();
        info!(remaining_secs = self.remaining_secs, "timer reset");
        Some(Event::TimerReset {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance by one second. Call once per elapsed second while running.
    ///
    /// Returns `Some(Event::PhaseChanged)` or `Some(Event::TimerHalted)` on
    /// the tick that exhausts the current phase.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            if self.remaining_secs > 0 {
                return None;
            }
        }
        Some(self.roll_over())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn set_custom_input(&mut self, which: Phase, text: &str) -> Option<Event> {
        let input = MinutesInput::sanitize(text);
        let current = match which {
            Phase::Focus => &self.custom_focus,
            Phase::Break => &self.custom_break,
        };
        if *current == input {
            return None;
        }
        let before = self.durations();
        let value = input.as_str().to_string();
        match which {
            Phase::Focus => self.custom_focus = input,
            Phase::Break => self.custom_break = input,
        }
        let restarted = self.durations() != before;
        if restarted {
            self.restart_focus();
        }
        debug!(input = which.name(), %value, restarted, "custom input changed");
        Some(Event::CustomInputChanged {
            input: which,
            value,
            restarted,
            at: Utc::now(),
        })
    }

    fn restart_focus(&mut self) {
        self.running = false;
        self.phase = Phase::Focus;
        self.remaining_secs = self.durations().secs_for(Phase::Focus);
    }

    fn roll_over(&mut self) -> Event {
        let from = self.phase;
        let to = from.next();
        let duration_secs = self.durations().secs_for(to);
        self.phase = to;
        self.remaining_secs = duration_secs;
        if duration_secs == 0 {
            self.running = false;
            info!(phase = to.name(), "next phase has no length, timer halted");
            return Event::TimerHalted {
                phase: to,
                at: Utc::now(),
            };
        }
        debug!(from = from.name(), to = to.name(), duration_secs, "phase changed");
        Event::PhaseChanged {
            from,
            to,
            duration_secs,
            at: Utc::now(),
        }
    }
}

/// Format seconds as `MM:SS`.
///
/// Minutes are zero-padded to two digits and grow past two digits as needed.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ticks(engine: &mut TimerEngine, n: u32) -> Vec<Event> {
        (0..n).filter_map(|_| engine.tick()).collect()
    }

    #[test]
    fn starts_idle_on_fifty_ten_focus() {
        let engine = TimerEngine::new();
        assert_eq!(engine.mode(), TimerMode::FiftyTen);
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 3000);
        assert!(!engine.is_running());
        assert_eq!(engine.custom_focus_input(), "50");
        assert_eq!(engine.custom_break_input(), "10");
        assert_eq!(engine.clock_text(), "50:00");
    }

    #[test]
    fn focus_rolls_into_break_on_the_tick_that_reaches_zero() {
        let mut engine = TimerEngine::new();
        assert!(engine.start().is_some());

        let events = run_ticks(&mut engine, 2999);
        assert!(events.is_empty());
        assert_eq!(engine.remaining_secs(), 1);
        assert_eq!(engine.phase(), Phase::Focus);

        match engine.tick() {
            Some(Event::PhaseChanged {
                from,
                to,
                duration_secs,
                ..
            }) => {
                assert_eq!(from, Phase::Focus);
                assert_eq!(to, Phase::Break);
                assert_eq!(duration_secs, 600);
            }
            other => panic!("Expected PhaseChanged, got {other:?}"),
        }
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.remaining_secs(), 600);
        assert!(engine.is_running());
    }

    #[test]
    fn break_rolls_back_into_focus() {
        let mut engine = TimerEngine::with_mode(TimerMode::ThirtyFive);
        engine.start();
        run_ticks(&mut engine, 30 * 60);
        assert_eq!(engine.phase(), Phase::Break);
        let events = run_ticks(&mut engine, 5 * 60);
        assert_eq!(events.len(), 1);
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 30 * 60);
        assert!(engine.is_running());
    }

    #[test]
    fn tick_is_noop_when_idle() {
        let mut engine = TimerEngine::new();
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 3000);
    }

    #[test]
    fn rollover_into_zero_length_phase_halts() {
        let mut engine = TimerEngine::with_custom_inputs(TimerMode::Custom, "1", "5");
        engine.start();
        // Break length drops to zero without going through the input setter.
        engine.custom_break = MinutesInput::sanitize("0");

        let events = run_ticks(&mut engine, 60);
        assert!(matches!(
            events.as_slice(),
            [Event::TimerHalted {
                phase: Phase::Break,
                ..
            }]
        ));
        assert!(!engine.is_running());
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.remaining_secs(), 0);
    }

    #[test]
    fn start_after_halt_reloads_focus() {
        let mut engine = TimerEngine::with_custom_inputs(TimerMode::Custom, "1", "5");
        engine.phase = Phase::Break;
        engine.remaining_secs = 0;

        assert!(engine.start().is_some());
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 60);
        assert!(engine.is_running());
    }

    #[test]
    fn start_rejected_when_config_invalid() {
        let mut engine = TimerEngine::with_custom_inputs(TimerMode::Custom, "0", "5");
        assert!(!engine.is_config_valid());
        let before = (engine.phase(), engine.remaining_secs());

        assert!(engine.start().is_none());
        assert!(!engine.is_running());
        assert_eq!((engine.phase(), engine.remaining_secs()), before);
    }

    #[test]
    fn start_twice_is_noop() {
        let mut engine = TimerEngine::new();
        assert!(engine.start().is_some());
        engine.tick();
        assert!(engine.start().is_none());
        assert_eq!(engine.remaining_secs(), 2999);
    }

    #[test]
    fn pause_keeps_phase_and_remaining() {
        let mut engine = TimerEngine::new();
        engine.start();
        run_ticks(&mut engine, 3000 + 17);
        let before = (engine.phase(), engine.remaining_secs());

        assert!(engine.pause().is_some());
        assert!(!engine.is_running());
        assert_eq!((engine.phase(), engine.remaining_secs()), before);
        assert!(engine.pause().is_none());

        engine.start();
        engine.tick();
        assert_eq!(engine.remaining_secs(), before.1 - 1);
    }

    #[test]
    fn reset_from_any_state() {
        let mut engine = TimerEngine::new();
        engine.start();
        run_ticks(&mut engine, 3100);
        assert_eq!(engine.phase(), Phase::Break);

        assert!(engine.reset().is_some());
        assert!(!engine.is_running());
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 3000);
    }

    #[test]
    fn toggle_alternates_start_and_pause() {
        let mut engine = TimerEngine::new();
        assert!(matches!(engine.toggle(), Some(Event::TimerStarted { .. })));
        assert!(matches!(engine.toggle(), Some(Event::TimerPaused { .. })));
        assert!(!engine.is_running());
    }

    #[test]
    fn selecting_other_mode_while_running_restarts() {
        let mut engine = TimerEngine::new();
        engine.start();
        run_ticks(&mut engine, 3010);

        assert!(engine.select_mode(TimerMode::ThirtyFive).is_some());
        assert!(!engine.is_running());
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 1800);
    }

    #[test]
    fn selecting_same_mode_is_noop() {
        let mut engine = TimerEngine::new();
        engine.start();
        engine.tick();
        assert!(engine.select_mode(TimerMode::FiftyTen).is_none());
        assert!(engine.is_running());
        assert_eq!(engine.remaining_secs(), 2999);
    }

    #[test]
    fn custom_input_is_sanitized() {
        let mut engine = TimerEngine::with_mode(TimerMode::Custom);
        engine.set_custom_focus_input("12a3bc");
        assert_eq!(engine.custom_focus_input(), "123");
        engine.set_custom_focus_input("99999");
        assert_eq!(engine.custom_focus_input(), "999");
        assert_eq!(engine.focus_minutes(), 600);
    }

    #[test]
    fn custom_edit_restarts_only_when_minutes_change() {
        let mut engine = TimerEngine::with_mode(TimerMode::Custom);
        engine.start();
        engine.tick();

        // "050" still means fifty minutes.
        match engine.set_custom_focus_input("050") {
            Some(Event::CustomInputChanged { restarted, .. }) => assert!(!restarted),
            other => panic!("Expected CustomInputChanged, got {other:?}"),
        }
        assert!(engine.is_running());
        assert_eq!(engine.remaining_secs(), 2999);

        match engine.set_custom_focus_input("25") {
            Some(Event::CustomInputChanged { restarted, .. }) => assert!(restarted),
            other => panic!("Expected CustomInputChanged, got {other:?}"),
        }
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_secs(), 1500);
    }

    #[test]
    fn custom_edit_under_preset_keeps_run() {
        let mut engine = TimerEngine::new();
        engine.start();
        engine.set_custom_break_input("3");
        assert!(engine.is_running());
        assert_eq!(engine.break_minutes(), 10);
        assert_eq!(engine.custom_break_input(), "3");
    }

    #[test]
    fn unchanged_custom_input_is_noop() {
        let mut engine = TimerEngine::with_mode(TimerMode::Custom);
        assert!(engine.set_custom_break_input("1x0").is_none());
    }

    #[test]
    fn empty_custom_input_invalidates_config() {
        let mut engine = TimerEngine::with_mode(TimerMode::Custom);
        engine.set_custom_break_input("");
        assert_eq!(engine.break_minutes(), 0);
        assert!(!engine.is_config_valid());
        assert!(engine.start().is_none());
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut engine = TimerEngine::with_custom_inputs(TimerMode::Custom, "1", "1");
        assert_eq!(engine.progress(), 0.0);
        engine.start();
        run_ticks(&mut engine, 30);
        assert!((engine.progress() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn progress_is_zero_without_phase_length() {
        let engine = TimerEngine::with_custom_inputs(TimerMode::Custom, "", "");
        assert_eq!(engine.total_secs(), 0);
        assert_eq!(engine.progress(), 0.0);
        assert_eq!(engine.clock_text(), "00:00");
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(3661), "61:01");
        assert_eq!(format_clock(600 * 60), "600:00");
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let engine = TimerEngine::new();
        match engine.snapshot() {
            Event::StateSnapshot {
                phase,
                remaining_secs,
                total_secs,
                clock_text,
                is_config_valid,
                ..
            } => {
                assert_eq!(phase, Phase::Focus);
                assert_eq!(remaining_secs, 3000);
                assert_eq!(total_secs, 3000);
                assert_eq!(clock_text, "50:00");
                assert!(is_config_valid);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
