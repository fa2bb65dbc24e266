//! Pricing: premium formula and month-to-date earnings.
//!
//! Layout:
//! - `premium.rs`: monthly premium from the policy holder's age
//! - `earnings.rs`: day-prorated earnings within a calendar month
//!
//! Every amount leaving this module is rounded to cents, half away from zero.

pub mod earnings;
pub mod premium;

pub use earnings::{
    age_in_years, days_in_month, days_into_current_month, month_to_date_earnings,
    policy_earnings_between_days_in_month,
};
pub use premium::calculate_monthly_premium;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round a decimal amount to cents.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a binary float amount to cents.
///
/// Non-finite input saturates instead of failing so callers stay total.
pub fn to_cents(amount: f64) -> Decimal {
    let value = Decimal::from_f64(amount).unwrap_or(if amount.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    });
    round_cents(value)
}

#[cfg(test)]
pub(crate) fn money(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}
