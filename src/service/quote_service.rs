use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, info};

use crate::db::{FilterValue, NewQuote, Quote, QuoteField, QuoteFilter, QuoteQuery, QuoteStorage};
use crate::error::QuoteError;
use crate::pricing::{
    age_in_years, calculate_monthly_premium, days_into_current_month, month_to_date_earnings,
};
use crate::service::clock::{Clock, SystemClock};

/// Quotes are sold for six months at a time.
pub const POLICY_TERM_MONTHS: u32 = 6;

/// Result of pricing and storing a new quote.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteCreated {
    pub quote_id: i64,
    pub monthly_premium: Decimal,
    pub six_month_premium: Decimal,
}

/// Optional narrowing for [`QuoteService::search_quotes_in_past_hours`].
/// Cost bounds are six-month amounts and are exclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PastHoursFilter {
    pub zip_code: Option<String>,
    pub greater_than: Option<Decimal>,
    pub less_than: Option<Decimal>,
}

/// Start of a look-back window; windows reaching past the calendar's range start at its beginning.
fn window_start(now: DateTime<Utc>, length: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(length).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// A fractional number of hours, to the millisecond; `None` when it exceeds any representable span.
fn hours_to_duration(hours: Decimal) -> Option<Duration> {
    let millis = hours.checked_mul(Decimal::from(MILLIS_PER_HOUR))?.trunc().to_i64()?;
    Duration::try_milliseconds(millis)
}

const MILLIS_PER_HOUR: i64 = 3_600_000;

#[derive(Clone)]
pub struct QuoteService {
    storage: QuoteStorage,
    clock: Arc<dyn Clock>,
}

impl QuoteService {
    pub fn new(storage: QuoteStorage) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: QuoteStorage, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    pub fn storage(&self) -> &QuoteStorage {
        &self.storage
    }

    /// Price a new policy from the holder's age and store it.
    pub async fn add_quote(
        &self,
        name: String,
        zip_code: String,
        date_of_birth: NaiveDate,
    ) -> Result<QuoteCreated, QuoteError> {
        let now = self.clock.now();
        let age = age_in_years(now, date_of_birth);
        let monthly_premium = calculate_monthly_premium(age);

        let quote_id = self
            .storage
            .insert(NewQuote {
                name,
                zip_code,
                date_of_birth,
                monthly_premium,
                created_at: now,
            })
            .await?;

        info!(quote_id, age, %monthly_premium, "quote created");
        Ok(QuoteCreated {
            quote_id,
            monthly_premium,
            six_month_premium: monthly_premium * Decimal::from(POLICY_TERM_MONTHS),
        })
    }

    /// Quotes matching every equality predicate, optionally only the newest one.
    pub async fn find_quotes(
        &self,
        filter: QuoteFilter,
        most_recent_only: bool,
    ) -> Result<Vec<Quote>, QuoteError> {
        let query = QuoteQuery::new(filter).most_recent_only(most_recent_only);
        let quotes = self.storage.query_all(&query).await?;
        debug!(count = quotes.len(), most_recent_only, "quotes found");
        Ok(quotes)
    }

    /// Quotes created within the last `hours_ago` hours.
    pub async fn search_quotes_in_past_hours(
        &self,
        hours_ago: Decimal,
        filter: PastHoursFilter,
    ) -> Result<Vec<Quote>, QuoteError> {
        let cutoff = match hours_to_duration(hours_ago) {
            Some(length) => window_start(self.clock.now(), length),
            None => DateTime::<Utc>::MIN_UTC,
        };
        let term = Decimal::from(POLICY_TERM_MONTHS);

        let mut equals = QuoteFilter::new();
        if let Some(zip_code) = filter.zip_code {
            equals = equals.with(QuoteField::ZipCode, FilterValue::Text(zip_code));
        }
        let query = QuoteQuery::new(equals)
            .created_after(cutoff)
            .premium_between(
                filter.greater_than.map(|bound| bound / term),
                filter.less_than.map(|bound| bound / term),
            );

        let quotes = self.storage.query_all(&query).await?;
        debug!(%hours_ago, count = quotes.len(), "recent quotes found");
        Ok(quotes)
    }

    /// Policies created within the last `days_ago` days.
    pub async fn policies_sold_since_days_ago(&self, days_ago: u32) -> Result<Vec<Quote>, QuoteError> {
        self.sold_since(self.clock.now(), days_ago).await
    }

    async fn sold_since(&self, now: DateTime<Utc>, days_ago: u32) -> Result<Vec<Quote>, QuoteError> {
        let cutoff = window_start(now, Duration::days(i64::from(days_ago)));
        self.storage
            .query_all(&QuoteQuery::default().created_after(cutoff))
            .await
    }

    /// Dollars earned so far this month by policies sold in the last `days_into_current_month` days.
    pub async fn search_premiums_for_current_month(
        &self,
        days_into_current_month: u32,
    ) -> Result<Decimal, QuoteError> {
        let now = self.clock.now();
        let policies = self.sold_since(now, days_into_current_month).await?;

        let total = month_to_date_earnings(
            now,
            policies.iter().map(|p| (p.created_at, p.monthly_premium)),
        );
        info!(policies = policies.len(), %total, "month-to-date earnings computed");
        Ok(total)
    }

    /// Month-to-date earnings for the month `now` falls in.
    pub async fn premiums_for_current_month(&self) -> Result<Decimal, QuoteError> {
        let days = days_into_current_month(self.clock.now());
        self.search_premiums_for_current_month(days).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::memory_storage;
    use crate::pricing::{money, policy_earnings_between_days_in_month};
    use crate::service::clock::FixedClock;
    use chrono::TimeZone;

    fn june_19() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 6, 19, 12, 0, 0).unwrap()
    }

    async fn service_at(now: DateTime<Utc>) -> QuoteService {
        QuoteService::with_clock(memory_storage().await, Arc::new(FixedClock(now)))
    }

    async fn seed(service: &QuoteService, name: &str, premium: &str, created_at: DateTime<Utc>) {
        service
            .storage()
            .insert(NewQuote {
                name: name.to_string(),
                zip_code: "11803".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1983, 8, 4).unwrap(),
                monthly_premium: money(premium),
                created_at,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn add_quote_prices_from_age_and_persists() {
        let now = june_19();
        let service = service_at(now).await;
        let dob = now.date_naive() - Duration::days(35 * 365 + 10);

        let created = service
            .add_quote("Ada Lovelace".into(), "12561".into(), dob)
            .await
            .unwrap();
        assert_eq!(created.monthly_premium, money("617.43"));
        assert_eq!(created.six_month_premium, money("3704.58"));

        let stored = service.storage().get_by_id(created.quote_id).await.unwrap();
        assert_eq!(stored.monthly_premium, money("617.43"));
        assert_eq!(stored.created_at, now);
        assert_eq!(stored.date_of_birth, dob);
    }

    #[tokio::test]
    async fn find_quotes_by_id_and_most_recent() {
        let service = service_at(june_19()).await;
        let dob = NaiveDate::from_ymd_opt(1972, 1, 1).unwrap();
        let first = service.add_quote("A".into(), "1".into(), dob).await.unwrap();
        let second = service.add_quote("B".into(), "1".into(), dob).await.unwrap();

        let by_id = QuoteFilter::from_pairs([("id", first.quote_id.to_string())]).unwrap();
        let found = service.find_quotes(by_id, false).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "A");

        let by_zip = QuoteFilter::from_pairs([("zip_code", "1")]).unwrap();
        let newest = service.find_quotes(by_zip, true).await.unwrap();
        assert_eq!(newest.len(), 1);
        assert_eq!(newest[0].id, second.quote_id);
    }

    #[tokio::test]
    async fn past_hours_divides_six_month_bounds() {
        let now = june_19();
        let service = service_at(now).await;
        seed(&service, "stale", "650", now - Duration::hours(13)).await;
        seed(&service, "base", "600", now - Duration::hours(3)).await;
        seed(&service, "young", "646.85", now - Duration::hours(2)).await;

        let all = service
            .search_quotes_in_past_hours(Decimal::from(12), PastHoursFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        // 3700 / 6 = 616.67 < 646.85 < 3900 / 6 = 650
        let filter = PastHoursFilter {
            zip_code: Some("11803".into()),
            greater_than: Some(money("3700")),
            less_than: Some(money("3900")),
        };
        let bounded = service.search_quotes_in_past_hours(Decimal::from(12), filter).await.unwrap();
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded[0].name, "young");

        let other_zip = PastHoursFilter {
            zip_code: Some("00000".into()),
            ..PastHoursFilter::default()
        };
        assert!(
            service
                .search_quotes_in_past_hours(Decimal::from(12), other_zip)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn past_hours_accepts_fractional_hours() {
        let now = june_19();
        let service = service_at(now).await;
        seed(&service, "older", "600", now - Duration::minutes(100)).await;
        seed(&service, "newer", "600", now - Duration::minutes(80)).await;

        let quotes = service
            .search_quotes_in_past_hours(money("1.5"), PastHoursFilter::default())
            .await
            .unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].name, "newer");

        let everything = service
            .search_quotes_in_past_hours(Decimal::MAX, PastHoursFilter::default())
            .await
            .unwrap();
        assert_eq!(everything.len(), 2);
    }

    #[tokio::test]
    async fn month_to_date_sums_only_the_window() {
        let now = june_19();
        let service = service_at(now).await;
        seed(&service, "may", "600", Utc.with_ymd_and_hms(2022, 5, 30, 9, 0, 0).unwrap()).await;
        seed(&service, "tenth", "600", Utc.with_ymd_and_hms(2022, 6, 10, 9, 0, 0).unwrap()).await;
        seed(&service, "today", "646.85", Utc.with_ymd_and_hms(2022, 6, 19, 8, 0, 0).unwrap()).await;

        let days = days_into_current_month(now);
        let total = service.search_premiums_for_current_month(days).await.unwrap();
        // 180.00 for the tenth, nothing yet for today
        assert_eq!(total, money("180.00"));
        assert_eq!(service.premiums_for_current_month().await.unwrap(), total);
    }

    #[tokio::test]
    async fn aggregate_equals_sum_over_window_for_every_n() {
        let now = june_19();
        let service = service_at(now).await;
        for (day, premium) in [(1, "600"), (5, "617.43"), (12, "646.85"), (18, "699.77")] {
            let at = Utc.with_ymd_and_hms(2022, 6, day, 6, 0, 0).unwrap();
            seed(&service, "p", premium, at).await;
        }

        for n in 0..=25u32 {
            let cutoff = now - Duration::days(i64::from(n));
            let expected: Decimal = service
                .storage()
                .query_all(&QuoteQuery::default())
                .await
                .unwrap()
                .into_iter()
                .filter(|p| p.created_at > cutoff)
                .map(|p| {
                    policy_earnings_between_days_in_month(
                        now.date_naive(),
                        p.created_at.date_naive(),
                        p.monthly_premium,
                    )
                })
                .sum();
            let total = service.search_premiums_for_current_month(n).await.unwrap();
            assert_eq!(total, expected, "window of {n} days");
        }
    }

    #[tokio::test]
    async fn policies_sold_since_days_ago_uses_clock() {
        let now = june_19();
        let service = service_at(now).await;
        seed(&service, "old", "600", now - Duration::days(8)).await;
        seed(&service, "new", "600", now - Duration::days(2)).await;

        let sold = service.policies_sold_since_days_ago(7).await.unwrap();
        assert_eq!(sold.len(), 1);
        assert_eq!(sold[0].name, "new");
    }
}
