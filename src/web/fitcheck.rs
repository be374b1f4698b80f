//! FitCheck health, config and insight endpoints

use super::error::error_body;
use crate::app_config::AppConfig;
use crate::insights::{evaluate, Metrics};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::{json, Value};

pub const SERVICE_NAME: &str = "FitCheck Insights API";

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_health)
        .service(view_config)
        .service(evaluate_insights);
}

#[get("/health")]
async fn view_health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok", "service": SERVICE_NAME }))
}

#[get("/config")]
async fn view_config(config: web::Data<AppConfig>) -> impl Responder {
    let insights = &config.insights;
    HttpResponse::Ok().json(json!({
        "steps_goal_daily": insights.steps_goal_daily,
        "sleep_min_hours": insights.sleep_min_hours,
        "calories_recommended": insights.calories_recommended,
    }))
}

/// Expects `{"weight": 76.5, "steps": 8700, "sleepHours": 6.3, "calories": 2100}`.
/// A body that is not JSON is read as `{}`.
#[post("/insights/evaluate")]
async fn evaluate_insights(config: web::Data<AppConfig>, body: web::Bytes) -> HttpResponse {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    match Metrics::from_json(&body) {
        Ok(metrics) => HttpResponse::Ok().json(evaluate(&metrics, &config.insights)),
        Err(e) => error_body(HttpResponse::BadRequest(), &e.to_string()),
    }
}
