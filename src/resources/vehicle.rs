use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use utoipa::ToSchema;

use crate::core::traits::{
    CreatableResource, MergeIntoActiveModel, Resource, SearchResource, WritableResource,
};
use crate::entities::{
    category, feature, location, rental,
    rental::RentalStatus,
    vehicle::{self, FuelType, Transmission},
    vehicle_feature,
};
use crate::errors::ApiError;
use crate::filtering::VehicleCriteria;
use crate::validation::{Validatable, ValidationError, ValidationErrors, validators};

const MIN_YEAR: i32 = 1950;
const MAX_YEAR: i32 = 2100;
const MAX_SEATS: i32 = 60;

/// A rentable vehicle together with the ids of the features it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i32,
    pub plate_number: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub seats: i32,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub daily_rental_fee: f64,
    pub category_id: i32,
    pub location_id: i32,
    pub active: bool,
    pub feature_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<vehicle::Model> for Vehicle {
    fn from(model: vehicle::Model) -> Self {
        Self {
            id: model.id,
            plate_number: model.plate_number,
            brand: model.brand,
            model: model.model,
            year: model.year,
            seats: model.seats,
            transmission: model.transmission,
            fuel_type: model.fuel_type,
            daily_rental_fee: model.daily_rental_fee,
            category_id: model.category_id,
            location_id: model.location_id,
            active: model.active,
            feature_ids: Vec::new(),
            created_at: model.created_at,
        }
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCreate {
    pub plate_number: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub seats: i32,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub daily_rental_fee: f64,
    pub category_id: i32,
    pub location_id: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub feature_ids: Vec<i32>,
}

impl Validatable for VehicleCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("plateNumber", &self.plate_number));
        errors.check(validators::validate_length("plateNumber", &self.plate_number, None, Some(16)));
        errors.check(validators::validate_required("brand", &self.brand));
        errors.check(validators::validate_length("brand", &self.brand, None, Some(64)));
        errors.check(validators::validate_required("model", &self.model));
        errors.check(validators::validate_length("model", &self.model, None, Some(64)));
        errors.check(validators::validate_range("year", self.year, Some(MIN_YEAR), Some(MAX_YEAR)));
        errors.check(validators::validate_range("seats", self.seats, Some(1), Some(MAX_SEATS)));
        errors.check(validators::validate_amount("dailyRentalFee", self.daily_rental_fee));
        errors.check(validate_feature_ids(&self.feature_ids));
        errors.result()
    }
}

impl From<VehicleCreate> for vehicle::ActiveModel {
    fn from(create: VehicleCreate) -> Self {
        Self {
            id: NotSet,
            plate_number: Set(create.plate_number.trim().to_uppercase()),
            brand: Set(create.brand.trim().to_string()),
            model: Set(create.model.trim().to_string()),
            year: Set(create.year),
            seats: Set(create.seats),
            transmission: Set(create.transmission),
            fuel_type: Set(create.fuel_type),
            daily_rental_fee: Set(create.daily_rental_fee),
            category_id: Set(create.category_id),
            location_id: Set(create.location_id),
            active: Set(create.active),
            created_at: Set(Utc::now()),
        }
    }
}

/// Back-office changes; absent fields are left untouched. A present
/// `featureIds` replaces the whole feature set.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleUpdate {
    pub daily_rental_fee: Option<f64>,
    pub location_id: Option<i32>,
    pub active: Option<bool>,
    pub feature_ids: Option<Vec<i32>>,
}

impl Validatable for VehicleUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(fee) = self.daily_rental_fee {
            errors.check(validators::validate_amount("dailyRentalFee", fee));
        }
        if let Some(feature_ids) = &self.feature_ids {
            errors.check(validate_feature_ids(feature_ids));
        }
        errors.result()
    }
}

impl MergeIntoActiveModel<vehicle::ActiveModel> for VehicleUpdate {
    fn merge_into_activemodel(
        self,
        mut existing: vehicle::ActiveModel,
    ) -> Result<vehicle::ActiveModel, DbErr> {
        if let Some(fee) = self.daily_rental_fee {
            existing.daily_rental_fee = Set(fee);
        }
        if let Some(location_id) = self.location_id {
            existing.location_id = Set(location_id);
        }
        if let Some(active) = self.active {
            existing.active = Set(active);
        }
        Ok(existing)
    }
}

fn validate_feature_ids(feature_ids: &[i32]) -> Result<(), ValidationError> {
    if feature_ids.iter().any(|id| *id < 1) {
        return Err(ValidationError::new("featureIds", "must contain positive identifiers"));
    }
    Ok(())
}

async fn replace_features<C>(conn: &C, vehicle_id: i32, feature_ids: &[i32]) -> Result<(), DbErr>
where
    C: sea_orm::ConnectionTrait,
{
    vehicle_feature::Entity::delete_many()
        .filter(vehicle_feature::Column::VehicleId.eq(vehicle_id))
        .exec(conn)
        .await?;

    let unique: BTreeSet<i32> = feature_ids.iter().copied().collect();
    if unique.is_empty() {
        return Ok(());
    }
    let rows = unique.into_iter().map(|feature_id| vehicle_feature::ActiveModel {
        vehicle_id: Set(vehicle_id),
        feature_id: Set(feature_id),
    });
    vehicle_feature::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl Resource for Vehicle {
    type EntityType = vehicle::Entity;
    type ColumnType = vehicle::Column;

    const ID_COLUMN: Self::ColumnType = vehicle::Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "Vehicle";
    const RESOURCE_NAME_PLURAL: &'static str = "vehicles";

    /// Loads the feature links of every vehicle on the page in one query.
    async fn hydrate(db: &DatabaseConnection, models: Vec<vehicle::Model>) -> Result<Vec<Self>, DbErr> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = models.iter().map(|model| model.id).collect();
        let links = vehicle_feature::Entity::find()
            .filter(vehicle_feature::Column::VehicleId.is_in(ids))
            .order_by_asc(vehicle_feature::Column::FeatureId)
            .all(db)
            .await?;

        let mut features: HashMap<i32, Vec<i32>> = HashMap::new();
        for link in links {
            features.entry(link.vehicle_id).or_default().push(link.feature_id);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let feature_ids = features.remove(&model.id).unwrap_or_default();
                Self {
                    feature_ids,
                    ..Self::from(model)
                }
            })
            .collect())
    }
}

#[async_trait]
impl CreatableResource for Vehicle {
    type ActiveModelType = vehicle::ActiveModel;
    type CreateModel = VehicleCreate;

    async fn create(db: &DatabaseConnection, create_model: VehicleCreate) -> Result<Self, DbErr> {
        let feature_ids = create_model.feature_ids.clone();
        let txn = db.begin().await?;
        let model = vehicle::ActiveModel::from(create_model).insert(&txn).await?;
        replace_features(&txn, model.id, &feature_ids).await?;
        txn.commit().await?;
        Self::get_one(db, model.id).await
    }
}

#[async_trait]
impl WritableResource for Vehicle {
    type UpdateModel = VehicleUpdate;

    async fn update(db: &DatabaseConnection, id: i32, update_model: VehicleUpdate) -> Result<Self, DbErr> {
        let existing = vehicle::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound(format!(
                "{} not found",
                Self::RESOURCE_NAME_SINGULAR
            )))?;

        let feature_ids = update_model.feature_ids.clone();
        let txn = db.begin().await?;
        update_model
            .merge_into_activemodel(existing.into())?
            .update(&txn)
            .await?;
        if let Some(feature_ids) = feature_ids {
            replace_features(&txn, id, &feature_ids).await?;
        }
        txn.commit().await?;
        Self::get_one(db, id).await
    }
}

impl SearchResource for Vehicle {
    type Criteria = VehicleCriteria;

    fn sortable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("id", vehicle::Column::Id),
            ("plateNumber", vehicle::Column::PlateNumber),
            ("brand", vehicle::Column::Brand),
            ("model", vehicle::Column::Model),
            ("year", vehicle::Column::Year),
            ("seats", vehicle::Column::Seats),
            ("dailyRentalFee", vehicle::Column::DailyRentalFee),
            ("createdAt", vehicle::Column::CreatedAt),
        ]
    }
}

/// Reports every referenced category, location or feature that does not exist.
async fn check_references(
    db: &DatabaseConnection,
    category_id: Option<i32>,
    location_id: Option<i32>,
    feature_ids: &[i32],
) -> Result<(), ApiError> {
    let mut missing = Vec::new();
    if let Some(id) = category_id
        && category::Entity::find_by_id(id).one(db).await?.is_none()
    {
        missing.push(format!("categoryId: category {id} does not exist"));
    }
    if let Some(id) = location_id
        && location::Entity::find_by_id(id).one(db).await?.is_none()
    {
        missing.push(format!("locationId: location {id} does not exist"));
    }
    if !feature_ids.is_empty() {
        let wanted: BTreeSet<i32> = feature_ids.iter().copied().collect();
        let found: BTreeSet<i32> = feature::Entity::find()
            .filter(feature::Column::Id.is_in(wanted.iter().copied()))
            .all(db)
            .await?
            .into_iter()
            .map(|feature| feature.id)
            .collect();
        for id in wanted.difference(&found) {
            missing.push(format!("featureIds: feature {id} does not exist"));
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_failed(missing))
    }
}

/// Validates the payload and its references, then inserts the vehicle.
///
/// # Errors
///
/// 422 for invalid payloads or dangling references, 409 for a duplicate plate.
pub async fn create_vehicle(db: &DatabaseConnection, payload: VehicleCreate) -> Result<Vehicle, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::validation_failed(e.messages()))?;
    check_references(db, Some(payload.category_id), Some(payload.location_id), &payload.feature_ids)
        .await?;

    let vehicle = Vehicle::create(db, payload).await?;
    tracing::info!(vehicle_id = vehicle.id, plate = %vehicle.plate_number, "Vehicle created");
    Ok(vehicle)
}

/// # Errors
///
/// 404 for an unknown vehicle, 422 for invalid payloads or references.
pub async fn update_vehicle(
    db: &DatabaseConnection,
    id: i32,
    payload: VehicleUpdate,
) -> Result<Vehicle, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::validation_failed(e.messages()))?;
    check_references(
        db,
        None,
        payload.location_id,
        payload.feature_ids.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(Vehicle::update(db, id, payload).await?)
}

/// Removes a vehicle that was never rented. Vehicles with open bookings, or
/// with a rental history that must be kept, can only be deactivated.
///
/// # Errors
///
/// 404 for an unknown vehicle, 409 when rentals reference it.
pub async fn delete_vehicle(db: &DatabaseConnection, id: i32) -> Result<i32, ApiError> {
    if vehicle::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(ApiError::not_found(Vehicle::RESOURCE_NAME_SINGULAR, Some(id.to_string())));
    }

    let open = rental::Entity::find()
        .filter(rental::Column::VehicleId.eq(id))
        .filter(rental::Column::Status.is_in([RentalStatus::Pending, RentalStatus::Confirmed]))
        .count(db)
        .await?;
    if open > 0 {
        return Err(ApiError::conflict(format!(
            "Vehicle {id} has {open} pending or confirmed rental(s)"
        )));
    }

    let history = rental::Entity::find()
        .filter(rental::Column::VehicleId.eq(id))
        .count(db)
        .await?;
    if history > 0 {
        return Err(ApiError::conflict(format!(
            "Vehicle {id} has rental history; deactivate it instead"
        )));
    }

    Vehicle::delete(db, id).await?;
    tracing::info!(vehicle_id = id, "Vehicle deleted");
    Ok(id)
}
