use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::round_cents;

const SECONDS_PER_DAY: i64 = 86_400;
/// Ages are counted in fixed 365-day years; leap days are not accounted for.
const DAYS_PER_YEAR: i64 = 365;

/// Number of calendar days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        // December of the last representable year
        None => 31,
    }
}

/// How many whole days of the current month have already passed.
pub fn days_into_current_month(now: DateTime<Utc>) -> u32 {
    now.day() - 1
}

/// Whole years between `date_of_birth` (midnight UTC) and `now`, floored.
///
/// A birth date in the future yields a negative age.
pub fn age_in_years(now: DateTime<Utc>, date_of_birth: NaiveDate) -> i64 {
    let born = date_of_birth.and_time(chrono::NaiveTime::MIN).and_utc();
    let elapsed = now.timestamp() - born.timestamp();
    elapsed.div_euclid(SECONDS_PER_DAY * DAYS_PER_YEAR)
}

/// Dollars earned by a policy between its start day and the measurement day.
///
/// Only the day-of-month of each date is read, so both dates must fall in the
/// month being measured. A start day after the measurement day gives a
/// negative amount.
pub fn policy_earnings_between_days_in_month(
    measurement_date: NaiveDate,
    policy_start_date: NaiveDate,
    monthly_premium: Decimal,
) -> Decimal {
    let days_this_month = Decimal::from(days_in_month(measurement_date));
    let cost_per_day = monthly_premium / days_this_month;
    let active_days =
        i64::from(measurement_date.day()) - i64::from(policy_start_date.day());

    round_cents(cost_per_day * Decimal::from(active_days))
}

/// Sum of each policy's earnings so far this month, as of `now`.
///
/// Policies are `(created_at, monthly_premium)` pairs. Each term is rounded to
/// cents; the total is not rounded again.
pub fn month_to_date_earnings<I>(now: DateTime<Utc>, policies: I) -> Decimal
where
    I: IntoIterator<Item = (DateTime<Utc>, Decimal)>,
{
    let measurement_date = now.date_naive();
    policies
        .into_iter()
        .map(|(created_at, monthly_premium)| {
            policy_earnings_between_days_in_month(
                measurement_date,
                created_at.date_naive(),
                monthly_premium,
            )
        })
        .sum()
}
