use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};

use crate::core::traits::Resource;
use crate::errors::ApiError;
use crate::filtering::Page;
use crate::models::FilterOptions;
use crate::resources::{Vehicle, VehicleCreate, VehicleUpdate, vehicle};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/vehicles",
    params(FilterOptions),
    responses(
        (status = axum::http::StatusCode::OK, description = "One page of matching vehicles", body = Page<Vehicle>),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "Invalid criteria, sort or page parameters"),
        (status = axum::http::StatusCode::SERVICE_UNAVAILABLE, description = "Data unavailable")
    ),
    tag = "vehicles",
    summary = "Search vehicles",
    description = "Filters the fleet by any combination of `categoryId`, `locationId`, `transmission`, \
        `fuelType`, `active`, `minDailyRentalFee`/`maxDailyRentalFee`, `minYear`/`maxYear`, \
        `minSeats`/`maxSeats`, `featureIds` (all required), `search` (plate, brand or model) and \
        `availableFrom`/`availableTo` (no confirmed rental in the window).\n\n\
        Sortable fields: id, plateNumber, brand, model, year, seats, dailyRentalFee, createdAt."
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(params): Query<FilterOptions>,
) -> Result<(HeaderMap, Json<Page<Vehicle>>), ApiError> {
    super::search::<Vehicle>(&state, &params).await
}

#[utoipa::path(
    get,
    path = "/vehicles/{id}",
    params(("id" = i32, Path, description = "Vehicle id")),
    responses(
        (status = axum::http::StatusCode::OK, description = "The vehicle", body = Vehicle),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Vehicle not found")
    ),
    tag = "vehicles",
    summary = "Get one vehicle"
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vehicle>, ApiError> {
    Ok(Json(Vehicle::get_one(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/vehicles",
    request_body = VehicleCreate,
    responses(
        (status = axum::http::StatusCode::CREATED, description = "Vehicle created", body = Vehicle),
        (status = axum::http::StatusCode::CONFLICT, description = "Plate number already registered"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload or unknown references")
    ),
    tag = "vehicles",
    summary = "Add a vehicle to the fleet"
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(payload): Json<VehicleCreate>,
) -> Result<(StatusCode, Json<Vehicle>), ApiError> {
    let vehicle = vehicle::create_vehicle(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

#[utoipa::path(
    put,
    path = "/vehicles/{id}",
    params(("id" = i32, Path, description = "Vehicle id")),
    request_body = VehicleUpdate,
    responses(
        (status = axum::http::StatusCode::OK, description = "Vehicle updated", body = Vehicle),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Vehicle not found"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload or unknown references")
    ),
    tag = "vehicles",
    summary = "Update fee, location, availability flag or features"
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<VehicleUpdate>,
) -> Result<Json<Vehicle>, ApiError> {
    Ok(Json(vehicle::update_vehicle(&state.db, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/vehicles/{id}",
    params(("id" = i32, Path, description = "Vehicle id")),
    responses(
        (status = axum::http::StatusCode::NO_CONTENT, description = "Vehicle deleted"),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Vehicle not found"),
        (status = axum::http::StatusCode::CONFLICT, description = "Vehicle has rentals")
    ),
    tag = "vehicles",
    summary = "Remove a vehicle that was never rented"
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    vehicle::delete_vehicle(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
