use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::QuoteError;
use crate::service::{PastHoursFilter, QuoteCreated};

/// Raw `POST /quote` body, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteForm {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// JSON clients often send zip codes as numbers.
    #[serde(default, deserialize_with = "lenient_string")]
    pub zip_code: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }),
    )
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct QuoteCreatedResponse {
    /// Two-decimal string, e.g. `"3704.58"`.
    pub six_month_premium: String,
    pub quote_id: i64,
}

impl From<QuoteCreated> for QuoteCreatedResponse {
    fn from(created: QuoteCreated) -> Self {
        Self {
            six_month_premium: format!("{:.2}", created.six_month_premium),
            quote_id: created.quote_id,
        }
    }
}

/// Query string of `GET /quote/search/{hours}`.
#[derive(Debug, Default, Deserialize)]
pub struct PastHoursQuery {
    pub zip_code: Option<String>,
    pub greater_than: Option<String>,
    pub less_than: Option<String>,
}

impl PastHoursQuery {
    /// Empty parameters count as absent.
    pub fn into_filter(self) -> Result<PastHoursFilter, QuoteError> {
        Ok(PastHoursFilter {
            zip_code: self.zip_code.filter(|z| !z.is_empty()),
            greater_than: parse_bound("greater_than", self.greater_than)?,
            less_than: parse_bound("less_than", self.less_than)?,
        })
    }
}

fn parse_bound(field: &str, raw: Option<String>) -> Result<Option<Decimal>, QuoteError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<Decimal>()
            .map(Some)
            .map_err(|e| QuoteError::invalid(field, e)),
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PremiumsResponse {
    #[serde(
        rename = "premiums this month so far",
        with = "rust_decimal::serde::float"
    )]
    pub premiums: Decimal,
}
