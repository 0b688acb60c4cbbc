//! Shared defaults and bounds.

/// Upper bound on instances generated from one recurring event (the base excluded).
pub const MAX_GENERATED_INSTANCES: usize = 100;

/// How far ahead a recurrence without an end date is expanded.
pub const DEFAULT_HORIZON_DAYS: i64 = 365;

/// Category reported for events that have none.
pub const DEFAULT_CATEGORY: &str = "General";

pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Length given to new events when neither an end nor a duration is supplied.
pub const DEFAULT_DURATION: &str = "1h";
