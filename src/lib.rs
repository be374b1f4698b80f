//! FitCheck service: package-scoped feature toggles plus the FitCheck
//! health, config and insight endpoints.

pub mod app_config;
pub mod dates;
pub mod db;
pub mod feature_toggle;
pub mod insights;
pub mod storage;
pub mod web;
