use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;

use crate::core::{booking, traits::Resource};
use crate::errors::ApiError;
use crate::filtering::Page;
use crate::models::FilterOptions;
use crate::resources::{Payment, PaymentCreate, Rental, RentalCreate};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/rentals",
    params(FilterOptions),
    responses(
        (status = axum::http::StatusCode::OK, description = "One page of matching rentals", body = Page<Rental>),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "Invalid criteria, sort or page parameters"),
        (status = axum::http::StatusCode::SERVICE_UNAVAILABLE, description = "Data unavailable")
    ),
    tag = "rentals",
    summary = "Search rentals",
    description = "Criteria: `userId`, `vehicleId`, `pickupLocationId`, `status`, \
        `minTotalPrice`/`maxTotalPrice`, `search` (vehicle plate, user name or email) and \
        `overlapsFrom`/`overlapsTo`.\n\n\
        Sortable fields: id, startDate, endDate, totalPrice, status, createdAt."
)]
pub async fn list_rentals(
    State(state): State<AppState>,
    Query(params): Query<FilterOptions>,
) -> Result<(HeaderMap, Json<Page<Rental>>), ApiError> {
    super::search::<Rental>(&state, &params).await
}

#[utoipa::path(
    get,
    path = "/rentals/{id}",
    params(("id" = i32, Path, description = "Rental id")),
    responses(
        (status = axum::http::StatusCode::OK, description = "The rental", body = Rental),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Rental not found")
    ),
    tag = "rentals",
    summary = "Get one rental"
)]
pub async fn get_rental(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Rental>, ApiError> {
    Ok(Json(Rental::get_one(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/rentals",
    request_body = RentalCreate,
    responses(
        (status = axum::http::StatusCode::CREATED, description = "Pending rental with its quoted price", body = Rental),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "Start date in the past or vehicle inactive"),
        (status = axum::http::StatusCode::NOT_FOUND, description = "User or vehicle not found"),
        (status = axum::http::StatusCode::CONFLICT, description = "Vehicle already booked for these dates"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload")
    ),
    tag = "rentals",
    summary = "Book a vehicle"
)]
pub async fn book_rental(
    State(state): State<AppState>,
    Json(payload): Json<RentalCreate>,
) -> Result<(StatusCode, Json<Rental>), ApiError> {
    let today = Utc::now().date_naive();
    let rental = booking::book_rental(&state.db, payload, today).await?;
    Ok((StatusCode::CREATED, Json(rental)))
}

#[utoipa::path(
    post,
    path = "/rentals/{id}/cancel",
    params(("id" = i32, Path, description = "Rental id")),
    responses(
        (status = axum::http::StatusCode::OK, description = "Rental cancelled", body = Rental),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Rental not found"),
        (status = axum::http::StatusCode::CONFLICT, description = "Rental already cancelled or completed")
    ),
    tag = "rentals",
    summary = "Cancel a rental"
)]
pub async fn cancel_rental(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Rental>, ApiError> {
    Ok(Json(booking::cancel_rental(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/rentals/{id}/complete",
    params(("id" = i32, Path, description = "Rental id")),
    responses(
        (status = axum::http::StatusCode::OK, description = "Rental completed", body = Rental),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Rental not found"),
        (status = axum::http::StatusCode::CONFLICT, description = "Rental is not confirmed")
    ),
    tag = "rentals",
    summary = "Mark a confirmed rental as returned"
)]
pub async fn complete_rental(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Rental>, ApiError> {
    Ok(Json(booking::complete_rental(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/rentals/{id}/payments",
    params(("id" = i32, Path, description = "Rental id")),
    request_body = PaymentCreate,
    responses(
        (status = axum::http::StatusCode::CREATED, description = "Payment recorded and rental confirmed", body = Payment),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "Amount differs from the total price"),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Rental not found"),
        (status = axum::http::StatusCode::CONFLICT, description = "Rental not pending or vehicle taken meanwhile")
    ),
    tag = "rentals",
    summary = "Pay for a pending rental"
)]
pub async fn pay_rental(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<PaymentCreate>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let payment = booking::pay_rental(&state.db, id, payload).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    get,
    path = "/rentals/{id}/payments",
    params(("id" = i32, Path, description = "Rental id")),
    responses(
        (status = axum::http::StatusCode::OK, description = "Payments in the order they were made", body = [Payment]),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Rental not found")
    ),
    tag = "rentals",
    summary = "List the payments of a rental"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    Ok(Json(booking::list_payments(&state.db, id).await?))
}
