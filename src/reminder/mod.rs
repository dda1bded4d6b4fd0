// Reminder scheduling - policy evaluation, the hourly runner and ICS export

pub mod ics;
pub mod policy;
pub mod runner;

pub use ics::ics_for_record;
pub use policy::{evaluate, ReminderDecision, ReminderTier, ReminderTiers};
pub use runner::ReminderRunner;
