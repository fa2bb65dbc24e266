use std::sync::LazyLock;

use axum::Json;
use serde_json::{Value, json};

static OPENAPI: LazyLock<Value> = LazyLock::new(|| {
    let quote_list = json!({
        "description": "List of policies that meet the filtering criteria",
        "content": { "application/json": { "schema": {
            "type": "array",
            "items": { "$ref": "#/components/schemas/Quote" }
        }}}
    });
    let filter_params = json!([
        { "in": "query", "name": "id", "schema": { "type": "integer" }, "example": 12 },
        { "in": "query", "name": "name", "schema": { "type": "string" }, "example": "Ada Lovelace" },
        { "in": "query", "name": "zip_code", "schema": { "type": "string" }, "example": "11803" },
        { "in": "query", "name": "date_of_birth", "schema": { "type": "string", "format": "date" } },
        { "in": "query", "name": "monthly_premium", "schema": { "type": "number" }, "example": 617.43 },
        { "in": "query", "name": "created_at", "description": "UTC, YYYY-MM-DD HH:MM:SS or RFC 3339", "schema": { "type": "string" }, "example": "2022-06-12 20:11:22" }
    ]);

    json!({
        "openapi": "3.0.0",
        "info": { "title": "Auto Quote Service API", "version": env!("CARGO_PKG_VERSION") },
        "paths": {
            "/quote": { "post": {
                "summary": "Get a quote for 6 months of auto insurance.",
                "description": "Prices the policy from the holder's age and saves the quote as a policy.",
                "requestBody": { "required": true, "content": {
                    "application/x-www-form-urlencoded": { "schema": { "$ref": "#/components/schemas/QuoteRequest" } },
                    "application/json": { "schema": { "$ref": "#/components/schemas/QuoteRequest" } }
                }},
                "responses": {
                    "200": {
                        "description": "Price of the policy for 6 months and the quote id.",
                        "content": { "application/json": { "schema": {
                            "type": "object",
                            "properties": {
                                "six_month_premium": { "type": "string", "example": "3704.58" },
                                "quote_id": { "type": "integer", "example": 23 }
                            }
                        }}}
                    },
                    "400": { "$ref": "#/components/responses/Error" }
                }
            }},
            "/quote/search": { "get": {
                "summary": "Retrieve a filtered list of all quotes.",
                "parameters": filter_params.clone(),
                "responses": { "200": quote_list.clone(), "400": { "$ref": "#/components/responses/Error" } }
            }},
            "/quote/latest": { "get": {
                "summary": "Retrieve the most recent quote matching the filters.",
                "parameters": filter_params,
                "responses": { "200": quote_list.clone(), "400": { "$ref": "#/components/responses/Error" } }
            }},
            "/quote/search/{hours}": { "get": {
                "summary": "Retrieve quotes created within the last `hours` hours.",
                "parameters": [
                    { "in": "path", "name": "hours", "required": true, "description": "non-negative, fractions allowed", "schema": { "type": "number" }, "example": 12 },
                    { "in": "query", "name": "zip_code", "schema": { "type": "string" }, "example": "11803" },
                    { "in": "query", "name": "greater_than", "description": "six month cost lower bound (exclusive)", "schema": { "type": "number" } },
                    { "in": "query", "name": "less_than", "description": "six month cost upper bound (exclusive)", "schema": { "type": "number" } }
                ],
                "responses": { "200": quote_list, "400": { "$ref": "#/components/responses/Error" } }
            }},
            "/premiums": { "get": {
                "summary": "Premiums earned so far this month from new policies.",
                "description": "Assumes every quote became a policy and none were cancelled.",
                "responses": { "200": {
                    "description": "Month-to-date earnings.",
                    "content": { "application/json": { "schema": {
                        "type": "object",
                        "properties": { "premiums this month so far": { "type": "number", "example": 1620.43 } }
                    }}}
                }}
            }}
        },
        "components": {
            "schemas": {
                "Quote": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "example": 1 },
                        "name": { "type": "string", "example": "Ada Lovelace" },
                        "zip_code": { "type": "string", "example": "12561" },
                        "date_of_birth": { "type": "string", "format": "date", "example": "1983-08-04" },
                        "monthly_premium": { "type": "number", "example": 617.43 },
                        "created_at": { "type": "string", "description": "UTC, YYYY-MM-DD HH:MM:SS", "example": "2022-06-12 20:11:22" }
                    }
                },
                "QuoteRequest": {
                    "type": "object",
                    "required": ["name", "zip_code", "date_of_birth"],
                    "properties": {
                        "name": { "type": "string", "example": "Ada Lovelace" },
                        "zip_code": { "type": "string", "example": "12561" },
                        "date_of_birth": { "type": "string", "format": "date", "example": "1983-08-04" }
                    }
                }
            },
            "responses": {
                "Error": {
                    "description": "Rejected request",
                    "content": { "application/json": { "schema": {
                        "type": "object",
                        "properties": { "error": { "type": "object", "properties": {
                            "code": { "type": "string" },
                            "message": { "type": "string" }
                        }}}
                    }}}
                }
            }
        }
    })
});

/// GET /docs/openapi.json
pub async fn openapi_document() -> Json<Value> {
    Json(OPENAPI.clone())
}
