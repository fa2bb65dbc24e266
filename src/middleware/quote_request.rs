use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use chrono::NaiveDate;

use crate::db::schema::DATE_FORMAT;
use crate::error::QuoteError;
use crate::types::QuoteForm;

/// A validated quote request, accepted as form-urlencoded or JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteApplication {
    pub name: String,
    pub zip_code: String,
    pub date_of_birth: NaiveDate,
}

impl TryFrom<QuoteForm> for QuoteApplication {
    type Error = QuoteError;

    fn try_from(form: QuoteForm) -> Result<Self, Self::Error> {
        let name = required("name", form.name)?;
        let zip_code = required("zip_code", form.zip_code)?;
        let date_of_birth = required("date_of_birth", form.date_of_birth)?;
        let date_of_birth = NaiveDate::parse_from_str(&date_of_birth, DATE_FORMAT)
            .map_err(|e| QuoteError::invalid("date_of_birth", e))?;

        Ok(Self {
            name,
            zip_code,
            date_of_birth,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, QuoteError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(QuoteError::MissingField(field))
}

impl<S> FromRequest<S> for QuoteApplication
where
    S: Send + Sync,
{
    type Rejection = QuoteError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let form = if is_json {
            let Json(form) = Json::<QuoteForm>::from_request(req, state)
                .await
                .map_err(|rejection| QuoteError::MalformedPayload(rejection.body_text()))?;
            form
        } else {
            let Form(form) = Form::<QuoteForm>::from_request(req, state)
                .await
                .map_err(|rejection| QuoteError::MalformedPayload(rejection.body_text()))?;
            form
        };

        form.try_into()
    }
}
