//! Feature toggle endpoints
//!
//! Every handler resolves the storage handle before looking at its input, so
//! a missing database always answers 500 "Database not initialized".

use crate::db::Gateway;
use crate::feature_toggle::{self, CreateToggleRequest, ToggleError, UpdateDatesRequest};
use crate::storage::ToggleStore;
use actix_web::{delete, get, post, put, web, Error, HttpResponse};
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_feature_toggle)
        .service(list_active_feature_toggles)
        .service(list_feature_toggles_by_date)
        .service(list_feature_toggles)
        .service(delete_package_feature_toggles)
        .service(delete_all_feature_toggles)
        .service(view_feature_toggle)
        .service(update_feature_toggle_dates);
}

#[derive(Deserialize)]
struct ByDateQuery {
    date: Option<String>,
}

async fn get_store(gateway: &Gateway) -> Result<Arc<dyn ToggleStore>, ToggleError> {
    gateway
        .get_handle()
        .await
        .ok_or(ToggleError::NotInitialized)
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[post("/feature-toggle")]
async fn create_feature_toggle(
    gateway: web::Data<Gateway>,
    body: Result<web::Json<CreateToggleRequest>, Error>,
) -> Result<HttpResponse, Error> {
    let store = get_store(&gateway).await?;
    let request = body?.into_inner();

    let id = feature_toggle::create(store.as_ref(), request, now()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Feature toggle created successfully",
        "_id": id,
    })))
}

#[get("/feature-toggles/{package}")]
async fn list_feature_toggles(
    gateway: web::Data<Gateway>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let store = get_store(&gateway).await?;
    let toggles = feature_toggle::list_all(store.as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(toggles))
}

#[get("/feature-toggle/{package}/{id}")]
async fn view_feature_toggle(
    gateway: web::Data<Gateway>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, Error> {
    let store = get_store(&gateway).await?;
    let (package, id) = path.into_inner();
    let toggle = feature_toggle::get_by_id(store.as_ref(), &package, &id).await?;
    Ok(HttpResponse::Ok().json(toggle))
}

#[get("/feature-toggles/{package}/active")]
async fn list_active_feature_toggles(
    gateway: web::Data<Gateway>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let store = get_store(&gateway).await?;
    let toggles = feature_toggle::list_active(store.as_ref(), &path, now()).await?;
    Ok(HttpResponse::Ok().json(toggles))
}

#[get("/feature-toggles/{package}/by-date")]
async fn list_feature_toggles_by_date(
    gateway: web::Data<Gateway>,
    path: web::Path<String>,
    query: web::Query<ByDateQuery>,
) -> Result<HttpResponse, Error> {
    let store = get_store(&gateway).await?;
    let date = query.date.as_deref().unwrap_or_default();
    let toggles = feature_toggle::list_by_date(store.as_ref(), &path, date).await?;
    Ok(HttpResponse::Ok().json(toggles))
}

#[put("/feature-toggle/{package}/{id}/update-dates")]
async fn update_feature_toggle_dates(
    gateway: web::Data<Gateway>,
    path: web::Path<(String, String)>,
    body: Result<web::Json<UpdateDatesRequest>, Error>,
) -> Result<HttpResponse, Error> {
    let store = get_store(&gateway).await?;
    let request = body?.into_inner();
    let (package, id) = path.into_inner();

    feature_toggle::update_dates(store.as_ref(), &package, &id, request, now()).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Dates updated" })))
}

#[delete("/feature-toggles/{package}")]
async fn delete_package_feature_toggles(
    gateway: web::Data<Gateway>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let store = get_store(&gateway).await?;
    feature_toggle::delete_all_in_package(store.as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "All feature toggles deleted" })))
}

#[delete("/feature-toggles")]
async fn delete_all_feature_toggles(gateway: web::Data<Gateway>) -> Result<HttpResponse, Error> {
    let store = get_store(&gateway).await?;
    let removed = feature_toggle::delete_all_packages(store.as_ref()).await?;
    log::info!("Deleted {} feature toggles across all packages", removed);
    Ok(HttpResponse::Ok().json(json!({ "message": "All feature toggles deleted" })))
}
