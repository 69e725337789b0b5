//! Habit list with change notifications.
//!
//! The store is an owned, in-memory list. Screens subscribe an observer and
//! re-render from the slice handed to them after every mutation.

mod stats;

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;

pub use stats::{week_start, HabitStats, HabitSummary, WEEK_DAYS};

/// Identifier assigned by [`HabitStore::add`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub u32);

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    /// Days on which the habit was completed.
    pub completion_dates: BTreeSet<NaiveDate>,
}

impl Habit {
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completion_dates.contains(&date)
    }

    pub fn latest_completion(&self) -> Option<NaiveDate> {
        self.completion_dates.last().copied()
    }
}

/// Mutation that just happened in a [`HabitStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HabitChange {
    Added {
        id: HabitId,
    },
    Toggled {
        id: HabitId,
        date: NaiveDate,
        completed: bool,
    },
    Removed {
        id: HabitId,
    },
}

/// Receives every change together with the list as it is afterwards.
pub trait HabitObserver: Send {
    fn on_change(&mut self, change: &HabitChange, habits: &[Habit]);
}

impl<F> HabitObserver for F
where
    F: FnMut(&HabitChange, &[Habit]) + Send,
{
    fn on_change(&mut self, change: &HabitChange, habits: &[Habit]) {
        self(change, habits)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct HabitStore {
    habits: Vec<Habit>,
    next_id: u32,
    observers: Vec<(SubscriptionId, Box<dyn HabitObserver>)>,
    next_subscription: u64,
}

impl fmt::Debug for HabitStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HabitStore")
            .field("habits", &self.habits)
            .field("next_id", &self.next_id)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl HabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn subscribe<O>(&mut self, observer: O) -> SubscriptionId
    where
        O: HabitObserver + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Add a habit named `name` (trimmed).
    pub fn add(&mut self, name: &str) -> Result<HabitId, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankHabitName);
        }
        let id = HabitId(self.next_id);
        self.next_id += 1;
        self.habits.push(Habit {
            id,
            name: name.to_string(),
            completion_dates: BTreeSet::new(),
        });
        debug!(%id, habit = name, "habit added");
        self.notify(HabitChange::Added { id });
        Ok(id)
    }

    /// Mark or unmark `date` as completed.
    ///
    /// Returns whether anything changed; observers only hear about changes.
    pub fn set_completed(
        &mut self,
        id: HabitId,
        date: NaiveDate,
        completed: bool,
    ) -> Result<bool, ValidationError> {
        let habit = self
            .habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(ValidationError::UnknownHabit(id))?;
        let changed = if completed {
            habit.completion_dates.insert(date)
        } else {
            habit.completion_dates.remove(&date)
        };
        if changed {
            debug!(%id, %date, completed, "habit toggled");
            self.notify(HabitChange::Toggled {
                id,
                date,
                completed,
            });
        }
        Ok(changed)
    }

    /// [`HabitStore::set_completed`] for the local calendar day.
    pub fn set_completed_today(
        &mut self,
        id: HabitId,
        completed: bool,
    ) -> Result<bool, ValidationError> {
        self.set_completed(id, Local::now().date_naive(), completed)
    }

    pub fn remove(&mut self, id: HabitId) -> Result<Habit, ValidationError> {
        let index = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or(ValidationError::UnknownHabit(id))?;
        let habit = self.habits.remove(index);
        debug!(%id, "habit removed");
        self.notify(HabitChange::Removed { id });
        Ok(habit)
    }

    /// Summary for the stats screen; `None` while there are no habits.
    pub fn summary(&self, today: NaiveDate) -> Option<HabitSummary> {
        HabitSummary::compute(&self.habits, today)
    }

    fn notify(&mut self, change: HabitChange) {
        for (_, observer) in &mut self.observers {
            observer.on_change(&change, &self.habits);
        }
    }
}
