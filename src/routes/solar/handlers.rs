use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;

use crate::auth::CurrentUser;
use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::repository::{NewSolarData, SolarRepository};

use super::types::{SolarDataResponse, UpdateSolarDataRequest};

/// Sunrise and sunset for a city on a date, from the database when already known
#[utoipa::path(
    get,
    path = "/api/SW/getdata/{city}/{date}",
    params(
        ("city" = String, Path, description = "City name, any casing"),
        ("date" = String, Path, description = "Date as yyyy-MM-dd"),
    ),
    responses(
        (status = 200, description = "Solar data", body = SolarDataResponse),
        (status = 400, description = "Invalid input or upstream failure"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No data upstream"),
    ),
    tag = "solar"
)]
pub async fn get_solar_data(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path((city, date)): Path<(String, String)>,
) -> AppResult<Json<SolarDataResponse>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date".to_string()))?;

    let record = state.pipeline().get_solar_data(&city, Some(date)).await?;
    Ok(Json(record.into()))
}

/// List every stored solar record
#[utoipa::path(
    get,
    path = "/api/SW/getall",
    responses(
        (status = 200, description = "All stored solar records", body = Vec<SolarDataResponse>),
        (status = 403, description = "Admin role required"),
    ),
    tag = "solar"
)]
pub async fn get_all_solar_data(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<SolarDataResponse>>> {
    user.require_admin()?;

    let records = SolarRepository::new(&state.db, &state.normalizer)
        .get_all_solar_data()
        .await?;

    Ok(Json(records.into_iter().map(SolarDataResponse::from).collect()))
}

/// Edit a stored solar record
#[utoipa::path(
    patch,
    path = "/api/SW/update/{id}",
    params(
        ("id" = i32, Path, description = "Solar record ID"),
    ),
    request_body = UpdateSolarDataRequest,
    responses(
        (status = 200, description = "Record updated", body = SolarDataResponse),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Another record has that city and date"),
    ),
    tag = "solar"
)]
pub async fn update_solar_data(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateSolarDataRequest>,
) -> AppResult<Json<SolarDataResponse>> {
    user.require_admin()?;

    let repo = SolarRepository::new(&state.db, &state.normalizer);
    let existing = repo
        .get_solar_data_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Solar data {id} not found")))?;

    let merged = NewSolarData {
        city: body.city.unwrap_or(existing.city),
        date: body.date.unwrap_or(existing.date),
        sunrise: body.sunrise.unwrap_or(existing.sunrise),
        sunset: body.sunset.unwrap_or(existing.sunset),
        solar_noon: body.solar_noon.or(existing.solar_noon),
        day_length: body.day_length.or(existing.day_length),
        country: body.country.or(existing.country),
        timezone: body.timezone.or(existing.timezone),
    };

    let updated = repo
        .update_solar_data(id, merged)
        .await
        .map_err(|e| {
            AppError::conflict_on_unique(e, "Solar data for that city and date already exists")
        })?
        .ok_or_else(|| AppError::NotFound(format!("Solar data {id} not found")))?;
    tracing::info!(id, admin = %user.username, "Solar data updated");

    Ok(Json(updated.into()))
}

/// Delete a stored solar record
#[utoipa::path(
    delete,
    path = "/api/SW/delete/{id}",
    params(
        ("id" = i32, Path, description = "Solar record ID"),
    ),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Record not found"),
    ),
    tag = "solar"
)]
pub async fn delete_solar_data(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    user.require_admin()?;

    let result = SolarRepository::new(&state.db, &state.normalizer)
        .delete_solar_data(id)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Solar data {id} not found")));
    }

    tracing::info!(id, admin = %user.username, "Solar data deleted");
    Ok(StatusCode::NO_CONTENT)
}
