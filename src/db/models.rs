use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stored quote. Every quote is treated as an active policy from `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub id: i64,
    pub name: String,
    pub zip_code: String,
    pub date_of_birth: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_premium: Decimal,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// `created_at` on the wire uses the same `YYYY-MM-DD HH:MM:SS` text it is
/// stored and filtered with.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::db::schema::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map(|t| t.and_utc())
            .map_err(D::Error::custom)
    }
}

/// A quote about to be inserted; `id` is assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuote {
    pub name: String,
    pub zip_code: String,
    pub date_of_birth: NaiveDate,
    pub monthly_premium: Decimal,
    pub created_at: DateTime<Utc>,
}
