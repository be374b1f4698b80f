//! Feature toggles: time-bounded records grouped by package.
//!
//! Every operation validates its own input and talks to the store directly;
//! there are no transactions spanning several toggles. Concurrent date
//! updates of one toggle are last-write-wins.

pub mod error;

use crate::dates::{self, date_time_format};
use crate::storage::{DateFilter, ToggleStore};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use error::ToggleError;
use error::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureToggle {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(with = "date_time_format")]
    pub beginning_date: NaiveDateTime,
    #[serde(with = "date_time_format")]
    pub expiration_date: NaiveDateTime,
    #[serde(with = "date_time_format")]
    pub created_at: NaiveDateTime,
    #[serde(with = "date_time_format")]
    pub updated_at: NaiveDateTime,
}

/// Body of `POST /feature-toggle`. Dates are `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateToggleRequest {
    #[validate(required, length(min = 1))]
    pub package_name: Option<String>,
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required)]
    pub description: Option<String>,
    #[validate(required)]
    pub beginning_date: Option<String>,
    #[validate(required)]
    pub expiration_date: Option<String>,
}

const CREATE_FIELDS: [&str; 5] = [
    "package_name",
    "name",
    "description",
    "beginning_date",
    "expiration_date",
];

/// Body of `PUT .../update-dates`. A `null` date counts as absent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDatesRequest {
    #[serde(default)]
    pub beginning_date: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
}

fn parse_or(value: &str, hint: &'static str) -> Result<NaiveDateTime, ToggleError> {
    dates::parse_date_time(value).ok_or(ToggleError::InvalidDate(hint))
}

/// Validate and store a new toggle, returning its generated id.
pub async fn create(
    store: &dyn ToggleStore,
    request: CreateToggleRequest,
    now: NaiveDateTime,
) -> Result<String, ToggleError> {
    if let Err(errors) = request.validate() {
        let field_errors = errors.field_errors();
        let fields: Vec<&str> = CREATE_FIELDS
            .into_iter()
            .filter(|field| field_errors.contains_key(field))
            .collect();
        return Err(ToggleError::InvalidRequest(format!(
            "Invalid request! Missing or empty fields: {}",
            fields.join(", ")
        )));
    }

    // All fields are present once validation has passed.
    let package_name = request.package_name.unwrap_or_default();
    let name = request.name.unwrap_or_default();
    let description = request.description.unwrap_or_default();
    let beginning_date = request.beginning_date.unwrap_or_default();
    let expiration_date = request.expiration_date.unwrap_or_default();

    let beginning_date = parse_or(&beginning_date, CREATE_DATE_TIME_FORMAT_HINT)?;
    let expiration_date = parse_or(&expiration_date, CREATE_DATE_TIME_FORMAT_HINT)?;
    if beginning_date > expiration_date {
        return Err(ToggleError::DateOrder(BEGINNING_AFTER_EXPIRATION));
    }

    let toggle = FeatureToggle {
        id: Uuid::new_v4().to_string(),
        name,
        description,
        beginning_date,
        expiration_date,
        created_at: now,
        updated_at: now,
    };
    store.insert(&package_name, &toggle).await?;
    log::info!("Created feature toggle {} in {}", toggle.id, package_name);

    Ok(toggle.id)
}

pub async fn list_all(
    store: &dyn ToggleStore,
    package: &str,
) -> Result<Vec<FeatureToggle>, ToggleError> {
    Ok(store.find_all(package).await?)
}

pub async fn get_by_id(
    store: &dyn ToggleStore,
    package: &str,
    id: &str,
) -> Result<FeatureToggle, ToggleError> {
    store
        .find_by_id(package, id)
        .await?
        .ok_or(ToggleError::NotFound)
}

/// Toggles strictly active at `now`: `beginning_date < now < expiration_date`.
pub async fn list_active(
    store: &dyn ToggleStore,
    package: &str,
    now: NaiveDateTime,
) -> Result<Vec<FeatureToggle>, ToggleError> {
    Ok(store.find_matching(package, DateFilter::ActiveAt(now)).await?)
}

/// Toggles covering midnight of `date` (`YYYY-MM-DD`), bounds inclusive.
///
/// Unlike [`list_active`] both bounds match, so a toggle expiring exactly at
/// midnight is still listed for that day.
pub async fn list_by_date(
    store: &dyn ToggleStore,
    package: &str,
    date: &str,
) -> Result<Vec<FeatureToggle>, ToggleError> {
    let date = dates::parse_date(date).ok_or(ToggleError::InvalidDate(DATE_FORMAT_HINT))?;
    Ok(store.find_matching(package, DateFilter::CoversDate(date)).await?)
}

/// Change one or both dates of a stored toggle.
///
/// Each supplied date is checked against the stored value of the opposite
/// date, not against the other new value; when both are supplied they are
/// first checked against each other.
pub async fn update_dates(
    store: &dyn ToggleStore,
    package: &str,
    id: &str,
    request: UpdateDatesRequest,
    now: NaiveDateTime,
) -> Result<(), ToggleError> {
    if request.beginning_date.is_none() && request.expiration_date.is_none() {
        return Err(ToggleError::InvalidRequest(NO_DATES.to_string()));
    }

    let new_expiration = request
        .expiration_date
        .as_deref()
        .map(|value| parse_or(value, DATE_TIME_FORMAT_HINT))
        .transpose()?;
    let new_beginning = request
        .beginning_date
        .as_deref()
        .map(|value| parse_or(value, DATE_TIME_FORMAT_HINT))
        .transpose()?;

    if let (Some(beginning), Some(expiration)) = (new_beginning, new_expiration) {
        if beginning > expiration {
            return Err(ToggleError::DateOrder(BEGINNING_AFTER_EXPIRATION));
        }
    }

    let mut toggle = get_by_id(store, package, id).await?;
    let current_beginning = toggle.beginning_date;
    let current_expiration = toggle.expiration_date;

    if let Some(expiration) = new_expiration {
        if expiration < current_beginning {
            return Err(ToggleError::DateOrder(EXPIRATION_BEFORE_CURRENT_BEGINNING));
        }
        toggle.expiration_date = expiration;
    }
    if let Some(beginning) = new_beginning {
        if beginning > current_expiration {
            return Err(ToggleError::DateOrder(BEGINNING_AFTER_CURRENT_EXPIRATION));
        }
        toggle.beginning_date = beginning;
    }
    toggle.updated_at = now;

    if !store.replace(package, &toggle).await? {
        // Deleted between the lookup and the write.
        return Err(ToggleError::NotFound);
    }
    log::debug!("Updated dates of feature toggle {} in {}", id, package);

    Ok(())
}

/// Empty one package. Succeeds whether or not it held any toggles.
pub async fn delete_all_in_package(
    store: &dyn ToggleStore,
    package: &str,
) -> Result<u64, ToggleError> {
    let removed = store.delete_all(package).await?;
    log::info!("Deleted {} feature toggles from {}", removed, package);
    Ok(removed)
}

/// Empty every known package.
pub async fn delete_all_packages(store: &dyn ToggleStore) -> Result<u64, ToggleError> {
    let mut removed = 0;
    for package in store.packages().await? {
        removed += delete_all_in_package(store, &package).await?;
    }
    Ok(removed)
}
