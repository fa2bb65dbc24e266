use rust_decimal::Decimal;

use super::to_cents;

/// Age at which the premium bottoms out at the base rate.
pub const BASE_AGE: i64 = 50;
/// Monthly premium, in dollars, for a policy holder aged exactly [`BASE_AGE`].
pub const BASE_RATE: f64 = 600.0;
const RISK_FACTOR: f64 = 0.3;
const RISK_EXPONENT: f64 = 1.5;

/// Monthly premium for a policy holder of the given age, in dollars and cents.
///
/// `600 + 0.3 * |age - 50|^1.5`, rounded half away from zero. Every `i64` is
/// accepted, including ages no driver could have.
pub fn calculate_monthly_premium(age: i64) -> Decimal {
    let distance = age.abs_diff(BASE_AGE) as f64;
    to_cents(BASE_RATE + RISK_FACTOR * distance.powf(RISK_EXPONENT))
}
