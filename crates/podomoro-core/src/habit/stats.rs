use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::{Habit, HabitId};

/// Length of the rolling week, today included.
pub const WEEK_DAYS: u32 = 7;

/// First day of the rolling week that ends on `today`.
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(WEEK_DAYS - 1)))
        .unwrap_or(NaiveDate::MIN)
}

fn weekly_count(habit: &Habit, today: NaiveDate) -> u32 {
    habit
        .completion_dates
        .range(week_start(today)..=today)
        .count() as u32
}

/// Per-habit card on the stats screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitStats {
    pub id: HabitId,
    pub name: String,
    pub completed_today: bool,
    pub weekly_count: u32,
    /// Weekly count against a goal of every day, 0.0 .. 1.0.
    pub weekly_progress: f64,
    pub total_count: u32,
    pub latest_completion: Option<NaiveDate>,
}

impl HabitStats {
    pub fn compute(habit: &Habit, today: NaiveDate) -> Self {
        let weekly_count = weekly_count(habit, today);
        Self {
            id: habit.id,
            name: habit.name.clone(),
            completed_today: habit.is_completed_on(today),
            weekly_count,
            weekly_progress: (f64::from(weekly_count) / f64::from(WEEK_DAYS)).clamp(0.0, 1.0),
            total_count: habit.completion_dates.len() as u32,
            latest_completion: habit.latest_completion(),
        }
    }
}

/// Summary card on the stats screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitSummary {
    pub total_habits: u32,
    pub completed_today: u32,
    pub week_completions: u32,
    pub total_completions: u32,
    pub completion_rate_percent: u32,
    /// Name and completion count of the habit completed most often.
    pub best_habit: Option<(String, u32)>,
    pub habits: Vec<HabitStats>,
}

impl HabitSummary {
    /// `None` for an empty list, which the screen shows as an empty state.
    pub fn compute(habits: &[Habit], today: NaiveDate) -> Option<Self> {
        if habits.is_empty() {
            return None;
        }
        let stats: Vec<HabitStats> = habits.iter().map(|h| HabitStats::compute(h, today)).collect();
        let total_habits = stats.len() as u32;
        let completed_today = stats.iter().filter(|s| s.completed_today).count() as u32;
        let completion_rate_percent =
            (f64::from(completed_today) / f64::from(total_habits) * 100.0).round() as u32;

        // Strictly greater keeps the earliest habit on ties.
        let best_habit = stats
            .iter()
            .filter(|s| s.total_count > 0)
            .fold(None::<&HabitStats>, |best, s| match best {
                Some(b) if b.total_count >= s.total_count => Some(b),
                _ => Some(s),
            })
            .map(|s| (s.name.clone(), s.total_count));

        Some(Self {
            total_habits,
            completed_today,
            week_completions: stats.iter().map(|s| s.weekly_count).sum(),
            total_completions: stats.iter().map(|s| s.total_count).sum(),
            completion_rate_percent,
            best_habit,
            habits: stats,
        })
    }

    /// Completed-today ratio for the summary progress bar.
    pub fn daily_progress(&self) -> f64 {
        if self.total_habits == 0 {
            return 0.0;
        }
        f64::from(self.completed_today) / f64::from(self.total_habits)
    }
}
