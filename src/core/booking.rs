//! Booking lifecycle: reserve, pay (which confirms), cancel and complete.
//!
//! Only `Confirmed` rentals hold a vehicle. A `Pending` booking is a quote the
//! customer still has to pay; the overlap check is therefore repeated inside
//! the payment transaction, with the rental and vehicle rows locked, and the
//! first payment to commit wins.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait,
};
use uuid::Uuid;

use crate::core::traits::Resource;
use crate::entities::{
    location, payment,
    rental::{self, RentalStatus},
    user, vehicle,
};
use crate::errors::ApiError;
use crate::filtering::DateWindow;
use crate::resources::{Payment, PaymentCreate, Rental, RentalCreate};
use crate::validation::Validatable;

const HALF_CENT: f64 = 0.005;

/// Whether a confirmed rental of `vehicle_id` overlaps `window`.
///
/// # Errors
///
/// Propagates storage failures.
pub async fn has_confirmed_overlap<C>(conn: &C, vehicle_id: i32, window: DateWindow) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let overlapping = rental::Entity::find()
        .filter(rental::Column::VehicleId.eq(vehicle_id))
        .filter(rental::Column::Status.eq(RentalStatus::Confirmed))
        .filter(rental::Column::StartDate.lt(window.end))
        .filter(rental::Column::EndDate.gt(window.start))
        .count(conn)
        .await?;
    Ok(overlapping > 0)
}

/// `days * daily_fee`, rounded to the cent.
///
/// # Errors
///
/// Fails for windows too long to price.
pub fn quote(window: DateWindow, daily_fee: f64) -> Result<f64, ApiError> {
    let days = i32::try_from(window.days())
        .map_err(|_| ApiError::bad_request("Rental period is too long"))?;
    Ok((f64::from(days) * daily_fee * 100.0).round() / 100.0)
}

async fn find_rental<C: ConnectionTrait>(conn: &C, id: i32) -> Result<rental::Model, ApiError> {
    rental::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ApiError::not_found(Rental::RESOURCE_NAME_SINGULAR, Some(id.to_string())))
}

/// `SELECT ... FOR UPDATE` on the rental, then on its vehicle. Payments for the
/// same vehicle queue behind each other; SQLite renders no lock clause since
/// it serialises writers anyway.
fn lock_rental(id: i32) -> Select<rental::Entity> {
    rental::Entity::find_by_id(id).lock_exclusive()
}

fn lock_vehicle(id: i32) -> Select<vehicle::Entity> {
    vehicle::Entity::find_by_id(id).lock_exclusive()
}

/// Creates a `Pending` rental priced from the vehicle's current daily fee.
///
/// # Errors
///
/// 422 for malformed payloads, 404 for an unknown user or vehicle, 400 for a
/// start date before `today` or an inactive vehicle, 409 when a confirmed
/// rental already holds the vehicle for an overlapping period.
pub async fn book_rental(
    db: &DatabaseConnection,
    payload: RentalCreate,
    today: NaiveDate,
) -> Result<Rental, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::validation_failed(e.messages()))?;
    let window = DateWindow::new(payload.start_date, payload.end_date)
        .map_err(|e| ApiError::validation_failed(vec![e.to_string()]))?;
    if window.start < today {
        return Err(ApiError::bad_request(format!(
            "startDate {} is in the past",
            window.start
        )));
    }

    if user::Entity::find_by_id(payload.user_id).one(db).await?.is_none() {
        return Err(ApiError::not_found("User", Some(payload.user_id.to_string())));
    }
    let vehicle = vehicle::Entity::find_by_id(payload.vehicle_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Vehicle", Some(payload.vehicle_id.to_string())))?;
    if !vehicle.active {
        return Err(ApiError::bad_request(format!(
            "Vehicle {} is not available for booking",
            vehicle.id
        )));
    }

    let return_location_id = payload.return_location_id.unwrap_or(payload.pickup_location_id);
    let mut missing = Vec::new();
    for (field, id) in [
        ("pickupLocationId", payload.pickup_location_id),
        ("returnLocationId", return_location_id),
    ] {
        if location::Entity::find_by_id(id).one(db).await?.is_none() {
            missing.push(format!("{field}: location {id} does not exist"));
        }
    }
    if !missing.is_empty() {
        return Err(ApiError::validation_failed(missing));
    }

    if has_confirmed_overlap(db, vehicle.id, window).await? {
        return Err(ApiError::conflict(format!(
            "Vehicle {} is already booked between {} and {}",
            vehicle.id, window.start, window.end
        )));
    }

    let total_price = quote(window, vehicle.daily_rental_fee)?;
    let model = rental::ActiveModel {
        id: NotSet,
        reference: Set(Uuid::new_v4()),
        user_id: Set(payload.user_id),
        vehicle_id: Set(vehicle.id),
        pickup_location_id: Set(payload.pickup_location_id),
        return_location_id: Set(return_location_id),
        start_date: Set(window.start),
        end_date: Set(window.end),
        total_price: Set(total_price),
        status: Set(RentalStatus::Pending),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    tracing::info!(
        rental_id = model.id,
        reference = %model.reference,
        vehicle_id = model.vehicle_id,
        total_price,
        "Rental booked"
    );
    Ok(Rental::from(model))
}

async fn transition(
    db: &DatabaseConnection,
    id: i32,
    allowed_from: &[RentalStatus],
    to: RentalStatus,
) -> Result<Rental, ApiError> {
    let existing = find_rental(db, id).await?;
    if !allowed_from.contains(&existing.status) {
        return Err(ApiError::conflict(format!(
            "Rental {id} is {:?} and cannot become {to:?}",
            existing.status
        )));
    }

    let from = existing.status;
    let mut active: rental::ActiveModel = existing.into();
    active.status = Set(to);
    let updated = active.update(db).await?;
    tracing::info!(rental_id = id, ?from, ?to, "Rental status changed");
    Ok(Rental::from(updated))
}

/// Pending or confirmed rentals can be cancelled, which releases the vehicle.
///
/// # Errors
///
/// 404 for an unknown rental, 409 for any other status.
pub async fn cancel_rental(db: &DatabaseConnection, id: i32) -> Result<Rental, ApiError> {
    transition(
        db,
        id,
        &[RentalStatus::Pending, RentalStatus::Confirmed],
        RentalStatus::Cancelled,
    )
    .await
}

/// # Errors
///
/// 404 for an unknown rental, 409 unless it is confirmed.
pub async fn complete_rental(db: &DatabaseConnection, id: i32) -> Result<Rental, ApiError> {
    transition(db, id, &[RentalStatus::Confirmed], RentalStatus::Completed).await
}

/// Records full payment for a pending rental and confirms it, in one
/// transaction.
///
/// # Errors
///
/// 422 for malformed payloads, 404 for an unknown rental, 400 when the amount
/// differs from the total price, 409 when the rental is not pending or a
/// confirmed rental now overlaps it.
pub async fn pay_rental(
    db: &DatabaseConnection,
    rental_id: i32,
    payload: PaymentCreate,
) -> Result<Payment, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::validation_failed(e.messages()))?;

    let txn = db.begin().await?;
    let existing = lock_rental(rental_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::not_found(Rental::RESOURCE_NAME_SINGULAR, Some(rental_id.to_string())))?;
    if existing.status != RentalStatus::Pending {
        return Err(ApiError::conflict(format!(
            "Rental {rental_id} is {:?}; only pending rentals can be paid",
            existing.status
        )));
    }
    if (payload.amount - existing.total_price).abs() >= HALF_CENT {
        return Err(ApiError::bad_request(format!(
            "amount must equal the total price {:.2}",
            existing.total_price
        )));
    }

    lock_vehicle(existing.vehicle_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::not_found("Vehicle", Some(existing.vehicle_id.to_string())))?;

    let window = DateWindow {
        start: existing.start_date,
        end: existing.end_date,
    };
    if has_confirmed_overlap(&txn, existing.vehicle_id, window).await? {
        return Err(ApiError::conflict(format!(
            "Vehicle {} was booked by someone else in the meantime",
            existing.vehicle_id
        )));
    }

    let payment = payment::ActiveModel {
        id: NotSet,
        rental_id: Set(rental_id),
        amount: Set(existing.total_price),
        method: Set(payload.method),
        paid_at: Set(Utc::now()),
    }
    .insert(&txn)
    .await?;

    let mut confirmed: rental::ActiveModel = existing.into();
    confirmed.status = Set(RentalStatus::Confirmed);
    confirmed.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(rental_id, payment_id = payment.id, "Rental paid and confirmed");
    Ok(Payment::from(payment))
}

/// # Errors
///
/// 404 for an unknown rental.
pub async fn list_payments(db: &DatabaseConnection, rental_id: i32) -> Result<Vec<Payment>, ApiError> {
    find_rental(db, rental_id).await?;
    let payments = payment::Entity::find()
        .filter(payment::Column::RentalId.eq(rental_id))
        .order_by_asc(payment::Column::Id)
        .all(db)
        .await?;
    Ok(payments.into_iter().map(Payment::from).collect())
}
