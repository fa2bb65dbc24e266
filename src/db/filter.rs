//! Typed query construction for the `quotes` table.
//!
//! Field names come from a fixed allow-list and every value is bound as a
//! parameter; caller input never reaches the SQL text.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::{QueryBuilder, Sqlite};

use crate::db::schema::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::error::QuoteError;

pub(crate) const SELECT_QUOTES: &str = "SELECT id, name, zip_code, date_of_birth, monthly_premium, created_at FROM quotes";

/// Columns a caller may filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteField {
    Id,
    Name,
    ZipCode,
    DateOfBirth,
    MonthlyPremium,
    CreatedAt,
}

impl QuoteField {
    pub fn column(self) -> &'static str {
        match self {
            QuoteField::Id => "id",
            QuoteField::Name => "name",
            QuoteField::ZipCode => "zip_code",
            QuoteField::DateOfBirth => "date_of_birth",
            QuoteField::MonthlyPremium => "monthly_premium",
            QuoteField::CreatedAt => "created_at",
        }
    }

    /// Parse a raw query-string value into the column's storage type.
    pub fn parse_value(self, raw: &str) -> Result<FilterValue, QuoteError> {
        let field = self.column();
        match self {
            QuoteField::Id => raw
                .trim()
                .parse::<i64>()
                .map(FilterValue::Integer)
                .map_err(|e| QuoteError::invalid(field, e)),
            QuoteField::MonthlyPremium => {
                let amount = raw
                    .trim()
                    .parse::<Decimal>()
                    .map_err(|e| QuoteError::invalid(field, e))?;
                amount
                    .to_f64()
                    .map(FilterValue::Real)
                    .ok_or_else(|| QuoteError::invalid(field, "out of range"))
            }
            QuoteField::DateOfBirth => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map(|d| FilterValue::Text(d.format(DATE_FORMAT).to_string()))
                .map_err(|e| QuoteError::invalid(field, e)),
            QuoteField::CreatedAt => parse_timestamp(raw.trim())
                .map(|t| FilterValue::Text(t.format(TIMESTAMP_FORMAT).to_string()))
                .map_err(|e| QuoteError::invalid(field, e)),
            QuoteField::Name | QuoteField::ZipCode => Ok(FilterValue::Text(raw.to_string())),
        }
    }
}

/// Stored `YYYY-MM-DD HH:MM:SS` text, or RFC 3339 normalized to UTC.
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).or_else(|e| {
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc).naive_utc())
            .map_err(|_| e)
    })
}

impl FromStr for QuoteField {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(QuoteField::Id),
            "name" => Ok(QuoteField::Name),
            "zip_code" => Ok(QuoteField::ZipCode),
            "date_of_birth" => Ok(QuoteField::DateOfBirth),
            "monthly_premium" => Ok(QuoteField::MonthlyPremium),
            "created_at" => Ok(QuoteField::CreatedAt),
            other => Err(QuoteError::UnknownFilterField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl FilterValue {
    fn push_bind(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            FilterValue::Integer(v) => qb.push_bind(*v),
            FilterValue::Real(v) => qb.push_bind(*v),
            FilterValue::Text(v) => qb.push_bind(v.clone()),
        };
    }
}

/// Equality predicates over allow-listed fields, ANDed together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteFilter {
    predicates: Vec<(QuoteField, FilterValue)>,
}

impl QuoteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw key/value pairs, rejecting unknown keys.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, QuoteError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |filter, (key, value)| {
                let field: QuoteField = key.as_ref().parse()?;
                Ok(filter.with(field, field.parse_value(value.as_ref())?))
            })
    }

    pub fn with(mut self, field: QuoteField, value: FilterValue) -> Self {
        self.predicates.push((field, value));
        self
    }
}

/// A full read against the `quotes` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteQuery {
    pub filter: QuoteFilter,
    /// Keep records with `created_at` strictly after this instant.
    pub created_after: Option<DateTime<Utc>>,
    /// Keep records with `monthly_premium` strictly above this amount.
    pub premium_above: Option<Decimal>,
    /// Keep records with `monthly_premium` strictly below this amount.
    pub premium_below: Option<Decimal>,
    /// Only the newest match, by id descending.
    pub most_recent_only: bool,
}

impl QuoteQuery {
    pub fn new(filter: QuoteFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn created_after(mut self, cutoff: DateTime<Utc>) -> Self {
        self.created_after = Some(cutoff);
        self
    }

    pub fn premium_between(mut self, above: Option<Decimal>, below: Option<Decimal>) -> Self {
        self.premium_above = above;
        self.premium_below = below;
        self
    }

    pub fn most_recent_only(mut self, most_recent_only: bool) -> Self {
        self.most_recent_only = most_recent_only;
        self
    }

    pub(crate) fn build(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(SELECT_QUOTES);
        qb.push(" WHERE 1=1");

        for (field, value) in &self.filter.predicates {
            qb.push(" AND ").push(field.column()).push(" = ");
            value.push_bind(&mut qb);
        }
        if let Some(cutoff) = self.created_after {
            qb.push(" AND created_at > ")
                .push_bind(cutoff.format(TIMESTAMP_FORMAT).to_string());
        }
        if let Some(above) = self.premium_above.and_then(|d| d.to_f64()) {
            qb.push(" AND monthly_premium > ").push_bind(above);
        }
        if let Some(below) = self.premium_below.and_then(|d| d.to_f64()) {
            qb.push(" AND monthly_premium < ").push_bind(below);
        }
        qb.push(" ORDER BY id");
        if self.most_recent_only {
            qb.push(" DESC LIMIT 1");
        }
        qb
    }
}
