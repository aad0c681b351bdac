use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::traits::{Resource, SearchResource};
use crate::entities::rental::{self, RentalStatus};
use crate::filtering::RentalCriteria;
use crate::validation::{Validatable, ValidationError, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: i32,
    pub reference: Uuid,
    pub user_id: i32,
    pub vehicle_id: i32,
    pub pickup_location_id: i32,
    pub return_location_id: i32,
    pub start_date: NaiveDate,
    /// Exclusive.
    pub end_date: NaiveDate,
    pub total_price: f64,
    pub status: RentalStatus,
    pub created_at: DateTime<Utc>,
}

impl From<rental::Model> for Rental {
    fn from(model: rental::Model) -> Self {
        Self {
            id: model.id,
            reference: model.reference,
            user_id: model.user_id,
            vehicle_id: model.vehicle_id,
            pickup_location_id: model.pickup_location_id,
            return_location_id: model.return_location_id,
            start_date: model.start_date,
            end_date: model.end_date,
            total_price: model.total_price,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

/// A booking request. Without `returnLocationId` the vehicle is returned where
/// it was picked up.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalCreate {
    pub user_id: i32,
    pub vehicle_id: i32,
    pub pickup_location_id: i32,
    pub return_location_id: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Validatable for RentalCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, id) in [
            ("userId", Some(self.user_id)),
            ("vehicleId", Some(self.vehicle_id)),
            ("pickupLocationId", Some(self.pickup_location_id)),
            ("returnLocationId", self.return_location_id),
        ] {
            if let Some(id) = id
                && id < 1
            {
                errors.add(ValidationError::new(field, "must be a positive identifier"));
            }
        }
        if self.start_date >= self.end_date {
            errors.add(ValidationError::new("endDate", "must be after startDate"));
        }
        errors.result()
    }
}

impl Resource for Rental {
    type EntityType = rental::Entity;
    type ColumnType = rental::Column;

    const ID_COLUMN: Self::ColumnType = rental::Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "Rental";
    const RESOURCE_NAME_PLURAL: &'static str = "rentals";
}

impl SearchResource for Rental {
    type Criteria = RentalCriteria;

    fn sortable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("id", rental::Column::Id),
            ("startDate", rental::Column::StartDate),
            ("endDate", rental::Column::EndDate),
            ("totalPrice", rental::Column::TotalPrice),
            ("status", rental::Column::Status),
            ("createdAt", rental::Column::CreatedAt),
        ]
    }
}
