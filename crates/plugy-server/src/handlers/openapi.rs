//! OpenAPI document describing the public routes.

use std::sync::Arc;

use axum::{extract::State, Json};
use plugy_config::ApiInfo;
use serde_json::{json, Value};

use crate::ServerState;

const OPENAPI_VERSION: &str = "3.1.0";

/// Serves the OpenAPI document built from the configured metadata.
pub async fn document(State(state): State<Arc<ServerState>>) -> Json<Value> {
    Json(build_document(&state.info))
}

/// Builds the document. Output depends only on `info`.
pub fn build_document(info: &ApiInfo) -> Value {
    json!({
        "openapi": OPENAPI_VERSION,
        "info": info,
        "paths": {
            "/": {
                "get": operation("Root", "root", "WelcomeResponse"),
            },
            "/health": {
                "get": operation("Health Check", "health_check", "HealthResponse"),
            },
        },
        "components": {
            "schemas": {
                "WelcomeResponse": string_object("message"),
                "HealthResponse": string_object("status"),
            },
        },
    })
}

fn operation(summary: &str, operation_id: &str, schema: &str) -> Value {
    json!({
        "summary": summary,
        "operationId": operation_id,
        "responses": {
            "200": {
                "description": "Successful Response",
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{schema}") },
                    },
                },
            },
        },
    })
}

fn string_object(field: &str) -> Value {
    json!({
        "type": "object",
        "properties": { field: { "type": "string" } },
        "required": [field],
    })
}
