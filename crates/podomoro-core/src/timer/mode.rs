use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::error::ValidationError;

/// Upper bound for any focus or break duration, in minutes.
pub const MAX_MINUTES: u32 = 600;

/// Custom inputs keep at most this many digits.
pub const MAX_INPUT_DIGITS: usize = 3;

/// Timer selection offered on the timer screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// 50 minutes focus, 10 minutes break.
    #[default]
    FiftyTen,
    /// 30 minutes focus, 5 minutes break.
    ThirtyFive,
    /// Durations come from the custom inputs.
    Custom,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::FiftyTen, TimerMode::ThirtyFive, TimerMode::Custom];

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::FiftyTen => "50/10",
            TimerMode::ThirtyFive => "30/5",
            TimerMode::Custom => "Custom",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TimerMode::FiftyTen => "50 min focus · 10 min break",
            TimerMode::ThirtyFive => "30 min focus · 5 min break",
            TimerMode::Custom => "Pick your own focus and break lengths",
        }
    }

    /// Fixed durations of a preset. `None` for [`TimerMode::Custom`].
    pub fn preset(self) -> Option<Durations> {
        match self {
            TimerMode::FiftyTen => Some(Durations::new(50, 10)),
            TimerMode::ThirtyFive => Some(Durations::new(30, 5)),
            TimerMode::Custom => None,
        }
    }

    /// Effective durations of this mode given the current custom inputs.
    pub fn durations(self, focus: &MinutesInput, brk: &MinutesInput) -> Durations {
        self.preset()
            .unwrap_or_else(|| Durations::new(focus.minutes(), brk.minutes()))
    }

    /// Kebab-case name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            TimerMode::FiftyTen => "fifty-ten",
            TimerMode::ThirtyFive => "thirty-five",
            TimerMode::Custom => "custom",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifty-ten" | "fifty_ten" | "50/10" => Ok(TimerMode::FiftyTen),
            "thirty-five" | "thirty_five" | "30/5" => Ok(TimerMode::ThirtyFive),
            "custom" => Ok(TimerMode::Custom),
            _ => Err(ValidationError::UnknownMode(s.to_string())),
        }
    }
}

/// Resolved focus/break lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub focus_minutes: u32,
    pub break_minutes: u32,
}

impl Durations {
    pub fn new(focus_minutes: u32, break_minutes: u32) -> Self {
        Self {
            focus_minutes,
            break_minutes,
        }
    }

    pub fn minutes_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_minutes,
            Phase::Break => self.break_minutes,
        }
    }

    pub fn secs_for(&self, phase: Phase) -> u32 {
        self.minutes_for(phase).saturating_mul(60)
    }

    /// Both phases must last at least a minute before the timer may start.
    pub fn is_valid(&self) -> bool {
        self.focus_minutes > 0 && self.break_minutes > 0
    }
}

/// Sanitized text of a custom duration field.
///
/// Holds only decimal digits, at most [`MAX_INPUT_DIGITS`] of them. Digits
/// from any script are accepted ("٢٥", "１５") and kept as typed so the field
/// shows what the user entered; [`MinutesInput::minutes`] turns the text into
/// a clamped number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MinutesInput(String);

impl MinutesInput {
    pub fn sanitize(raw: &str) -> Self {
        Self(
            raw.chars()
                .filter(|&c| decimal_value(c).is_some())
                .take(MAX_INPUT_DIGITS)
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn minutes(&self) -> u32 {
        parse_minutes(&self.0)
    }
}

impl From<String> for MinutesInput {
    fn from(raw: String) -> Self {
        Self::sanitize(&raw)
    }
}

impl From<MinutesInput> for String {
    fn from(input: MinutesInput) -> Self {
        input.0
    }
}

impl fmt::Display for MinutesInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First code point of every run of ten decimal digits (general category Nd).
const DECIMAL_ZEROS: [u32; 68] = [
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
    0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

/// Decimal value of a digit character in any script.
fn decimal_value(c: char) -> Option<u32> {
    let code = u32::from(c);
    let run = DECIMAL_ZEROS.partition_point(|&zero| zero <= code);
    let zero = DECIMAL_ZEROS[run.checked_sub(1)?];
    let value = code - zero;
    (value < 10).then_some(value)
}

/// Parse minutes from free text, clamped to `0..=MAX_MINUTES`.
///
/// Accepts an optional sign followed by decimal digits of any script.
/// Anything else (including empty text and values beyond `i32`) yields 0.
pub fn parse_minutes(text: &str) -> u32 {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.is_empty() {
        return 0;
    }
    let parsed = digits.chars().try_fold(0i32, |acc, c| {
        let digit = decimal_value(c)?;
        acc.checked_mul(10)?.checked_add(digit as i32)
    });
    match parsed {
        Some(value) if !negative => value.clamp(0, MAX_MINUTES as i32) as u32,
        _ => 0,
    }
}
