use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Transmission {
    #[sea_orm(string_value = "Manual")]
    Manual,
    #[sea_orm(string_value = "Automatic")]
    Automatic,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum FuelType {
    #[sea_orm(string_value = "Petrol")]
    Petrol,
    #[sea_orm(string_value = "Diesel")]
    Diesel,
    #[sea_orm(string_value = "Electric")]
    Electric,
    #[sea_orm(string_value = "Hybrid")]
    Hybrid,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
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
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(has_many = "super::vehicle_feature::Entity")]
    VehicleFeatures,
    #[sea_orm(has_many = "super::rental::Entity")]
    Rentals,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::vehicle_feature::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VehicleFeatures.def()
    }
}

impl Related<super::rental::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rentals.def()
    }
}

impl Related<super::feature::Entity> for Entity {
    fn to() -> RelationDef {
        super::vehicle_feature::Relation::Feature.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::vehicle_feature::Relation::Vehicle.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
