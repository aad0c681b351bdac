//! Reference data: vehicle categories, rental locations and optional features.

use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::traits::{CreatableResource, Resource};
use crate::entities::{category, feature, location};
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

impl From<category::Model> for Category {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Feature {
    pub id: i32,
    pub name: String,
}

impl From<feature::Model> for Feature {
    fn from(model: feature::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Payload shared by categories and features, which only carry a name.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NamedCreate {
    pub name: String,
}

impl Validatable for NamedCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("name", &self.name));
        errors.check(validators::validate_length("name", &self.name, None, Some(64)));
        errors.result()
    }
}

impl From<NamedCreate> for category::ActiveModel {
    fn from(create: NamedCreate) -> Self {
        Self {
            id: NotSet,
            name: Set(create.name.trim().to_string()),
        }
    }
}

impl From<NamedCreate> for feature::ActiveModel {
    fn from(create: NamedCreate) -> Self {
        Self {
            id: NotSet,
            name: Set(create.name.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub address: String,
}

impl From<location::Model> for Location {
    fn from(model: location::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            city: model.city,
            address: model.address,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LocationCreate {
    pub name: String,
    pub city: String,
    pub address: String,
}

impl Validatable for LocationCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, value, max) in [
            ("name", &self.name, 64),
            ("city", &self.city, 64),
            ("address", &self.address, 255),
        ] {
            errors.check(validators::validate_required(field, value));
            errors.check(validators::validate_length(field, value, None, Some(max)));
        }
        errors.result()
    }
}

impl From<LocationCreate> for location::ActiveModel {
    fn from(create: LocationCreate) -> Self {
        Self {
            id: NotSet,
            name: Set(create.name.trim().to_string()),
            city: Set(create.city.trim().to_string()),
            address: Set(create.address.trim().to_string()),
        }
    }
}

impl Resource for Category {
    type EntityType = category::Entity;
    type ColumnType = category::Column;

    const ID_COLUMN: Self::ColumnType = category::Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "Category";
    const RESOURCE_NAME_PLURAL: &'static str = "categories";
}

impl CreatableResource for Category {
    type ActiveModelType = category::ActiveModel;
    type CreateModel = NamedCreate;
}

impl Resource for Feature {
    type EntityType = feature::Entity;
    type ColumnType = feature::Column;

    const ID_COLUMN: Self::ColumnType = feature::Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "Feature";
    const RESOURCE_NAME_PLURAL: &'static str = "features";
}

impl CreatableResource for Feature {
    type ActiveModelType = feature::ActiveModel;
    type CreateModel = NamedCreate;
}

impl Resource for Location {
    type EntityType = location::Entity;
    type ColumnType = location::Column;

    const ID_COLUMN: Self::ColumnType = location::Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "Location";
    const RESOURCE_NAME_PLURAL: &'static str = "locations";
}

impl CreatableResource for Location {
    type ActiveModelType = location::ActiveModel;
    type CreateModel = LocationCreate;
}
