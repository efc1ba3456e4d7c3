pub mod date_range;
pub mod time_utils;

pub use date_range::DateRange;
