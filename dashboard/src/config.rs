//! Behavioral constants for analytics windows, urgency thresholds, and chart rendering.

use chrono::Duration;

/// Calendar months shown by the spend and mileage trends, current month included.
pub const TREND_MONTHS: usize = 6;

/// Length of the "approximate month" used for the monthly cost average.
pub const DAYS_PER_MONTH: i64 = 30;

/// Remaining distance under which an odometer-based reminder turns amber.
pub const ODOMETER_WARNING_KM: i64 = 500;

/// Remaining time under which a date-based reminder turns amber.
pub const DUE_DATE_WARNING: Duration = Duration::days(14);

/// Month-over-month mileage change (percent) below which a month is flagged red.
pub const MILEAGE_CRITICAL_DROP_PERCENT: f64 = -10.0;

/// Fuel efficiency points needed before the trend line is worth drawing.
pub const MIN_EFFICIENCY_POINTS: usize = 2;
