use rust_decimal::Decimal;

/// Percent complete of a finished project.
pub const FULL_COMPLETION_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Weekly reporting buckets close on Thursday.
pub const WEEKLY_BUCKET_WEEKDAY: chrono::Weekday = chrono::Weekday::Thu;
