use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;

use crate::db::{Quote, QuoteFilter};
use crate::error::QuoteError;
use crate::middleware::QuoteApplication;
use crate::router::QuoteState;
use crate::types::{PastHoursQuery, PremiumsResponse, QuoteCreatedResponse};

/// POST /quote -> prices six months of cover and stores the quote as a policy.
pub async fn add_quote(
    State(state): State<QuoteState>,
    application: QuoteApplication,
) -> Result<Json<QuoteCreatedResponse>, QuoteError> {
    let created = state
        .service
        .add_quote(
            application.name,
            application.zip_code,
            application.date_of_birth,
        )
        .await?;
    Ok(Json(created.into()))
}

/// GET /quote/search -> every query parameter is an equality filter.
pub async fn search_quotes(
    State(state): State<QuoteState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Quote>>, QuoteError> {
    let filter = QuoteFilter::from_pairs(params)?;
    Ok(Json(state.service.find_quotes(filter, false).await?))
}

/// GET /quote/latest -> same filters, newest match only.
pub async fn latest_quote(
    State(state): State<QuoteState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Quote>>, QuoteError> {
    let filter = QuoteFilter::from_pairs(params)?;
    Ok(Json(state.service.find_quotes(filter, true).await?))
}

/// GET /quote/search/{hours} -> quotes from the last `hours` hours.
pub async fn search_quotes_in_past_hours(
    State(state): State<QuoteState>,
    Path(hours): Path<String>,
    Query(query): Query<PastHoursQuery>,
) -> Result<Json<Vec<Quote>>, QuoteError> {
    let hours_ago: Decimal = hours
        .trim()
        .parse()
        .map_err(|e| QuoteError::invalid("hours", e))?;
    if hours_ago.is_sign_negative() && !hours_ago.is_zero() {
        return Err(QuoteError::invalid("hours", "must not be negative"));
    }
    let filter = query.into_filter()?;
    Ok(Json(
        state
            .service
            .search_quotes_in_past_hours(hours_ago, filter)
            .await?,
    ))
}

/// GET /premiums -> prorated earnings of policies started this month.
pub async fn premiums_this_month(
    State(state): State<QuoteState>,
) -> Result<Json<PremiumsResponse>, QuoteError> {
    let premiums = state.service.premiums_for_current_month().await?;
    Ok(Json(PremiumsResponse { premiums }))
}
