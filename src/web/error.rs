//! JSON error bodies for request extraction failures.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

/// `{"error": message}` with the given status builder.
pub fn error_body(mut builder: actix_web::HttpResponseBuilder, message: &str) -> HttpResponse {
    builder.json(json!({ "error": message }))
}

/// Body parsing failures become `400 {"error": "Invalid request! ..."}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected request body: {}", err);
    let message = format!("Invalid request! {}", err);
    let response = error_body(HttpResponse::BadRequest(), &message);
    InternalError::from_response(err, response).into()
}
