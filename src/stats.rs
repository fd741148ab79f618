use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::util::mean;

/// Entries this many days (or more) behind "today" are pruned, so the map
/// retains at most today back through today minus six.
pub const RETENTION_DAYS: i64 = 7;

/// Completed-focus-session counts keyed by calendar date.
///
/// In-memory only: a process restart starts the week over. Pruning is by
/// date arithmetic, not entry count, so gaps from idle days do not extend
/// the window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyStats {
    days: BTreeMap<NaiveDate, u32>,
}

impl DailyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed focus session on `date`, then prune anything
    /// that has fallen out of the trailing window relative to `today`.
    pub fn record_completion(&mut self, date: NaiveDate, today: NaiveDate) {
        *self.days.entry(date).or_insert(0) += 1;
        self.prune(today);
    }

    fn prune(&mut self, today: NaiveDate) {
        self.days
            .retain(|date, _| today.signed_duration_since(*date).num_days() < RETENTION_DAYS);
    }

    /// Mean of the retained daily counts; 0.0 when nothing has been
    /// recorded yet.
    pub fn weekly_average(&self) -> f64 {
        let counts: Vec<f64> = self.days.values().map(|&c| c as f64).collect();
        mean(&counts).unwrap_or(0.0)
    }

    pub fn today_count(&self, today: NaiveDate) -> u32 {
        self.days.get(&today).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn distinct_days(&self) -> usize {
        self.days.len()
    }
}
