use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::traits::Resource;
use crate::entities::payment::{self, PaymentMethod};
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i32,
    pub rental_id: i32,
    pub amount: f64,
    pub method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
}

impl From<payment::Model> for Payment {
    fn from(model: payment::Model) -> Self {
        Self {
            id: model.id,
            rental_id: model.rental_id,
            amount: model.amount,
            method: model.method,
            paid_at: model.paid_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreate {
    /// Must equal the rental's total price.
    pub amount: f64,
    pub method: PaymentMethod,
}

impl Validatable for PaymentCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_amount("amount", self.amount));
        errors.result()
    }
}

impl Resource for Payment {
    type EntityType = payment::Entity;
    type ColumnType = payment::Column;

    const ID_COLUMN: Self::ColumnType = payment::Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "Payment";
    const RESOURCE_NAME_PLURAL: &'static str = "payments";
}
