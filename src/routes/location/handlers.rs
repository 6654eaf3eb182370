use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::repository::CityRepository;

use super::types::{CityResponse, UpdateLocationRequest};

/// Resolve a city, from the database when already known
#[utoipa::path(
    get,
    path = "/api/Location/getlocation/{city}",
    params(
        ("city" = String, Path, description = "City name, any casing"),
    ),
    responses(
        (status = 200, description = "City resolved", body = CityResponse),
        (status = 400, description = "Empty city or upstream failure"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "City unknown to the geocoder"),
    ),
    tag = "location"
)]
pub async fn get_location(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(city): Path<String>,
) -> AppResult<Json<CityResponse>> {
    let city = state.pipeline().get_location(&city).await?;
    Ok(Json(city.into()))
}

/// List every stored city
#[utoipa::path(
    get,
    path = "/api/Location/getall",
    responses(
        (status = 200, description = "All stored cities", body = Vec<CityResponse>),
        (status = 403, description = "Admin role required"),
    ),
    tag = "location"
)]
pub async fn get_all_locations(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<CityResponse>>> {
    user.require_admin()?;

    let cities = CityRepository::new(&state.db, &state.normalizer)
        .get_all_cities()
        .await?;

    Ok(Json(cities.into_iter().map(CityResponse::from).collect()))
}

/// Re-resolve a city upstream and overwrite the stored row
#[utoipa::path(
    patch,
    path = "/api/Location/update/{id}",
    params(
        ("id" = i32, Path, description = "City row ID"),
    ),
    request_body = UpdateLocationRequest,
    responses(
        (status = 200, description = "City updated", body = CityResponse),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "City not found"),
    ),
    tag = "location"
)]
pub async fn update_location(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateLocationRequest>,
) -> AppResult<Json<CityResponse>> {
    user.require_admin()?;

    let city = state.pipeline().refresh_location(id, &body.city).await?;
    tracing::info!(id, city = %city.name, admin = %user.username, "City updated");

    Ok(Json(city.into()))
}

/// Delete a stored city
#[utoipa::path(
    delete,
    path = "/api/Location/delete/{id}",
    params(
        ("id" = i32, Path, description = "City row ID"),
    ),
    responses(
        (status = 204, description = "City deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "City not found"),
    ),
    tag = "location"
)]
pub async fn delete_location(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    user.require_admin()?;

    let result = CityRepository::new(&state.db, &state.normalizer)
        .delete_city(id)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("City {id} not found")));
    }

    tracing::info!(id, admin = %user.username, "City deleted");
    Ok(StatusCode::NO_CONTENT)
}
