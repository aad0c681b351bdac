use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    DatabaseConnection, DbErr,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::traits::{CreatableResource, MergeIntoActiveModel, Resource, WritableResource};
use crate::entities::user::{self, Role};
use crate::errors::ApiError;
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            phone: model.phone,
            role: model.role,
            created_at: model.created_at,
        }
    }
}

/// Self-registration always creates a customer account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl Validatable for UserCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("fullName", &self.full_name));
        errors.check(validators::validate_length("fullName", &self.full_name, None, Some(128)));
        errors.check(validators::validate_email("email", self.email.trim()));
        if let Some(phone) = &self.phone {
            errors.check(validators::validate_length("phone", phone, Some(5), Some(32)));
        }
        errors.result()
    }
}

impl From<UserCreate> for user::ActiveModel {
    fn from(create: UserCreate) -> Self {
        Self {
            id: NotSet,
            full_name: Set(create.full_name.trim().to_string()),
            email: Set(create.email.trim().to_lowercase()),
            phone: Set(create.phone.map(|phone| phone.trim().to_string())),
            role: Set(Role::Customer),
            created_at: Set(Utc::now()),
        }
    }
}

/// Profile changes; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

impl Validatable for UserUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(full_name) = &self.full_name {
            errors.check(validators::validate_required("fullName", full_name));
            errors.check(validators::validate_length("fullName", full_name, None, Some(128)));
        }
        if let Some(phone) = &self.phone {
            errors.check(validators::validate_length("phone", phone, Some(5), Some(32)));
        }
        errors.result()
    }
}

impl MergeIntoActiveModel<user::ActiveModel> for UserUpdate {
    fn merge_into_activemodel(self, mut existing: user::ActiveModel) -> Result<user::ActiveModel, DbErr> {
        if let Some(full_name) = self.full_name {
            existing.full_name = Set(full_name.trim().to_string());
        }
        if let Some(phone) = self.phone {
            existing.phone = Set(Some(phone.trim().to_string()));
        }
        Ok(existing)
    }
}

impl Resource for User {
    type EntityType = user::Entity;
    type ColumnType = user::Column;

    const ID_COLUMN: Self::ColumnType = user::Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "User";
    const RESOURCE_NAME_PLURAL: &'static str = "users";
}

impl CreatableResource for User {
    type ActiveModelType = user::ActiveModel;
    type CreateModel = UserCreate;
}

impl WritableResource for User {
    type UpdateModel = UserUpdate;
}

/// # Errors
///
/// 422 for an invalid payload, 409 when the email is already registered.
pub async fn register_user(db: &DatabaseConnection, payload: UserCreate) -> Result<User, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::validation_failed(e.messages()))?;
    let user = User::create(db, payload).await.map_err(|err| match ApiError::from(err) {
        ApiError::Conflict { .. } => ApiError::conflict("Email is already registered"),
        other => other,
    })?;
    tracing::info!(user_id = user.id, "User registered");
    Ok(user)
}

/// # Errors
///
/// 404 for an unknown user, 422 for an invalid payload.
pub async fn update_user(db: &DatabaseConnection, id: i32, payload: UserUpdate) -> Result<User, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::validation_failed(e.messages()))?;
    Ok(User::update(db, id, payload).await?)
}
