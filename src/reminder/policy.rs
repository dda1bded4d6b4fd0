// Reminder policy evaluator
//
// Pure date arithmetic: given a target date, a reference date and the
// configured day-offset tiers, decide whether a reminder is due today and at
// what urgency. Comparison is calendar-date only; time-of-day never matters.

use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderTier {
    Friendly,
    Unfriendly,
}

/// A due reminder: which tier matched and how many days remain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderDecision {
    pub tier: ReminderTier,
    pub days_left: u32,
}

/// Configured day-offsets per tier.
///
/// Declared order is the tie-break: all friendly offsets are considered
/// before all unfriendly ones, each in the order written in the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderTiers {
    pub friendly: Vec<u32>,
    pub unfriendly: Vec<u32>,
}

impl Default for ReminderTiers {
    fn default() -> Self {
        Self {
            friendly: vec![30, 14],
            unfriendly: vec![7, 2, 1, 0],
        }
    }
}

impl ReminderTiers {
    /// All (tier, offset) pairs in declared order
    fn offsets(&self) -> impl Iterator<Item = (ReminderTier, u32)> + '_ {
        self.friendly
            .iter()
            .map(|&d| (ReminderTier::Friendly, d))
            .chain(self.unfriendly.iter().map(|&d| (ReminderTier::Unfriendly, d)))
    }

    /// Offsets present in both tiers. Such a configuration is ambiguous; the
    /// evaluator resolves it deterministically but it should be fixed.
    pub fn overlapping_offsets(&self) -> Vec<u32> {
        self.friendly
            .iter()
            .copied()
            .filter(|d| self.unfriendly.contains(d))
            .collect()
    }
}

/// Decide whether a reminder for `target` is due on `reference`.
///
/// An offset `d` matches when `target - d days` falls on the same calendar
/// day as `reference`. The first match in declared tier order wins; further
/// matches are reported as a configuration overlap and ignored.
pub fn evaluate(
    target: DateTime<Utc>,
    reference: DateTime<Utc>,
    tiers: &ReminderTiers,
) -> Option<ReminderDecision> {
    let target_date = target.date_naive();
    let reference_date = reference.date_naive();

    let mut decision: Option<ReminderDecision> = None;

    for (tier, days) in tiers.offsets() {
        let candidate = match target_date.checked_sub_days(Days::new(u64::from(days))) {
            Some(date) => date,
            None => continue,
        };

        if candidate != reference_date {
            continue;
        }

        match decision {
            None => {
                decision = Some(ReminderDecision {
                    tier,
                    days_left: days,
                });
            }
            Some(first) => {
                tracing::warn!(
                    target_date = %target_date,
                    first_tier = ?first.tier,
                    first_offset = first.days_left,
                    shadowed_tier = ?tier,
                    shadowed_offset = days,
                    "overlapping reminder offsets; keeping the first declared match"
                );
            }
        }
    }

    decision
}
