use chrono::NaiveDate;
use sitefolio_core::evm::ReportingBucket;
use sitefolio_core::utils::DateRange;

use crate::error::{ApiError, ApiResult};

/// Parses an ISO `YYYY-MM-DD` date, naming the offending field on failure.
pub fn parse_date(raw: &str, field: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        ApiError::BadRequest(format!("Invalid {} '{}': {}", field, raw, e))
    })
}

pub fn parse_date_optional(raw: Option<String>, field: &str) -> ApiResult<Option<NaiveDate>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| parse_date(&s, field))
        .transpose()
}

/// Inclusive range from `startDate`/`endDate`; an inverted range is a configuration error.
pub fn parse_range(start: &str, end: &str) -> ApiResult<DateRange> {
    let start = parse_date(start, "startDate")?;
    let end = parse_date(end, "endDate")?;
    Ok(DateRange::new(start, end)?)
}

/// Rejects a range that could produce more than `max_points` bucket dates.
pub fn ensure_bucket_limit(
    range: DateRange,
    bucket: ReportingBucket,
    max_points: usize,
) -> ApiResult<()> {
    let days = (range.end() - range.start()).num_days() + 1;
    // Upper bounds: one Thursday per 7 days, one month start per 28.
    let buckets = match bucket {
        ReportingBucket::Day => days,
        ReportingBucket::Week => days / 7 + 1,
        ReportingBucket::Month => days / 28 + 1,
    };
    if buckets > i64::try_from(max_points).unwrap_or(i64::MAX) {
        return Err(ApiError::BadRequest(format!(
            "Range {} spans up to {} {} buckets, above the limit of {}",
            range,
            buckets,
            bucket.as_str(),
            max_points
        )));
    }
    Ok(())
}

/// Requested bucket, or the configured default when absent.
pub fn parse_bucket(raw: Option<&str>, default: ReportingBucket) -> ApiResult<ReportingBucket> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s
            .parse()
            .map_err(|e: sitefolio_core::errors::ValidationError| {
                ApiError::BadRequest(e.to_string())
            }),
        None => Ok(default),
    }
}
