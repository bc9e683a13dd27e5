use chrono::{Days, NaiveDate, NaiveDateTime};

/// Days per year for the time-to-expiry convention (ACT/365, whole days).
const DAYS_PER_YEAR: f64 = 365.0;

/// Year fraction from `now` to the start of `expiry`, counting only full
/// days left. Zero on the last day before expiry and negative after; the
/// pricer rejects both.
#[inline]
pub fn years_to_expiry(expiry: NaiveDate, now: NaiveDateTime) -> f64 {
    (expiry.and_time(chrono::NaiveTime::MIN) - now).num_days() as f64 / DAYS_PER_YEAR
}

/// Expiry used when none is configured: one year out.
pub fn default_expiry(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_days(Days::new(365))
        .unwrap_or(NaiveDate::MAX)
}
