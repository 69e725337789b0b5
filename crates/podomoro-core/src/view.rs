//! Render description of the timer screen.
//!
//! [`TimerView::of`] is a pure function of the engine; rendering adapters
//! turn the result into widgets and send user intents back as
//! [`crate::TimerCommand`]s.

use serde::Serialize;

use crate::timer::{Phase, TimerEngine, TimerMode, MAX_MINUTES};

/// Label of the start/pause button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryAction {
    Start,
    Pause,
}

impl PrimaryAction {
    pub fn label(self) -> &'static str {
        match self {
            PrimaryAction::Start => "Start",
            PrimaryAction::Pause => "Pause",
        }
    }
}

/// One selectable timer mode chip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeOption {
    pub mode: TimerMode,
    pub label: &'static str,
    pub selected: bool,
}

/// Custom duration fields, only shown for [`TimerMode::Custom`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomInputs {
    pub focus: String,
    #[serde(rename = "break")]
    pub break_: String,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerView {
    pub mode: TimerMode,
    pub mode_description: &'static str,
    pub modes: Vec<ModeOption>,
    pub custom_inputs: Option<CustomInputs>,
    pub phase: Phase,
    pub phase_title: &'static str,
    pub phase_message: &'static str,
    pub clock_text: String,
    pub progress: f64,
    pub next_phase_text: String,
    pub primary_action: PrimaryAction,
    pub primary_action_label: &'static str,
    pub primary_enabled: bool,
    pub config_summary: String,
    pub validation_message: Option<&'static str>,
}

impl TimerView {
    pub fn of(engine: &TimerEngine) -> Self {
        let mode = engine.mode();
        let durations = engine.durations();
        let phase = engine.phase();
        let primary_action = if engine.is_running() {
            PrimaryAction::Pause
        } else {
            PrimaryAction::Start
        };
        let next_phase_text = match phase.next() {
            Phase::Break => format!("Next: break {} min", durations.break_minutes),
            Phase::Focus => format!("Next: focus {} min", durations.focus_minutes),
        };
        let valid = durations.is_valid();

        Self {
            mode,
            mode_description: mode.description(),
            modes: TimerMode::ALL
                .iter()
                .map(|&m| ModeOption {
                    mode: m,
                    label: m.label(),
                    selected: m == mode,
                })
                .collect(),
            custom_inputs: (mode == TimerMode::Custom).then(|| CustomInputs {
                focus: engine.custom_focus_input().to_string(),
                break_: engine.custom_break_input().to_string(),
                hint: format!("Enter between 1 and {MAX_MINUTES} minutes."),
            }),
            phase,
            phase_title: phase.title(),
            phase_message: phase.message(),
            clock_text: engine.clock_text(),
            progress: engine.progress(),
            next_phase_text,
            primary_action,
            primary_action_label: primary_action.label(),
            primary_enabled: valid,
            config_summary: format!(
                "Focus {} min / Break {} min",
                durations.focus_minutes, durations.break_minutes
            ),
            validation_message: (!valid)
                .then_some("Set both focus and break to at least 1 minute."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view() {
        let view = TimerView::of(&TimerEngine::new());
        assert_eq!(view.clock_text, "50:00");
        assert_eq!(view.phase_title, "Focus time");
        assert_eq!(view.next_phase_text, "Next: break 10 min");
        assert_eq!(view.primary_action, PrimaryAction::Start);
        assert!(view.primary_enabled);
        assert!(view.custom_inputs.is_none());
        assert!(view.validation_message.is_none());
        assert_eq!(view.config_summary, "Focus 50 min / Break 10 min");
        let selected: Vec<_> = view.modes.iter().filter(|m| m.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].mode, TimerMode::FiftyTen);
    }

    #[test]
    fn running_view_offers_pause() {
        let mut engine = TimerEngine::new();
        engine.start();
        engine.tick();
        let view = TimerView::of(&engine);
        assert_eq!(view.primary_action_label, "Pause");
        assert_eq!(view.clock_text, "49:59");
        assert!(view.progress > 0.0);
    }

    #[test]
    fn invalid_custom_config_disables_start() {
        let engine = TimerEngine::with_custom_inputs(TimerMode::Custom, "0", "5");
        let view = TimerView::of(&engine);
        assert!(!view.primary_enabled);
        assert!(view.validation_message.is_some());
        let inputs = view.custom_inputs.expect("custom inputs shown");
        assert_eq!(inputs.focus, "0");
        assert_eq!(inputs.break_, "5");
    }

    #[test]
    fn break_phase_points_at_focus() {
        let mut engine = TimerEngine::with_mode(TimerMode::ThirtyFive);
        engine.start();
        for _ in 0..30 * 60 {
            engine.tick();
        }
        let view = TimerView::of(&engine);
        assert_eq!(view.phase, Phase::Break);
        assert_eq!(view.next_phase_text, "Next: focus 30 min");
    }
}
