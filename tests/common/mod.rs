#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use chrono::{NaiveDate, Utc};
use fleetdesk::{
    AppState, Migrator, Settings,
    entities::{
        category, feature, location,
        rental::{self, RentalStatus},
        user::{self, Role},
        vehicle::{self, FuelType, Transmission},
        vehicle_feature,
    },
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn test_settings() -> Settings {
    Settings {
        database_url: "sqlite::memory:".to_string(),
        ..Settings::default()
    }
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    fleetdesk::app(AppState::new(db, test_settings()))
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Ids of the reference rows created by [`seed_reference_data`].
pub struct Reference {
    pub economy: i32,
    pub suv: i32,
    pub airport: i32,
    pub downtown: i32,
    pub harbour: i32,
    pub gps: i32,
    pub child_seat: i32,
    pub bluetooth: i32,
}

pub async fn seed_reference_data(db: &DatabaseConnection) -> Result<Reference, DbErr> {
    let mut categories = Vec::new();
    for name in ["Economy", "SUV"] {
        let model = category::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(db)
        .await?;
        categories.push(model.id);
    }

    let mut locations = Vec::new();
    for (name, city) in [
        ("Airport", "Lisbon"),
        ("Downtown", "Lisbon"),
        ("Harbour", "Porto"),
    ] {
        let model = location::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            city: Set(city.to_string()),
            address: Set(format!("1 {name} Road")),
        }
        .insert(db)
        .await?;
        locations.push(model.id);
    }

    let mut features = Vec::new();
    for name in ["GPS", "Child seat", "Bluetooth"] {
        let model = feature::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(db)
        .await?;
        features.push(model.id);
    }

    Ok(Reference {
        economy: categories[0],
        suv: categories[1],
        airport: locations[0],
        downtown: locations[1],
        harbour: locations[2],
        gps: features[0],
        child_seat: features[1],
        bluetooth: features[2],
    })
}

/// Vehicle row with sensible defaults; override what a test cares about.
#[derive(Clone)]
pub struct VehicleSeed {
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
}

impl VehicleSeed {
    pub fn new(plate_number: &str, daily_rental_fee: f64, location_id: i32) -> Self {
        Self {
            plate_number: plate_number.to_string(),
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2021,
            seats: 5,
            transmission: Transmission::Manual,
            fuel_type: FuelType::Petrol,
            daily_rental_fee,
            category_id: 1,
            location_id,
            active: true,
        }
    }

    pub fn brand(mut self, brand: &str, model: &str) -> Self {
        self.brand = brand.to_string();
        self.model = model.to_string();
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub async fn insert(self, db: &DatabaseConnection) -> Result<vehicle::Model, DbErr> {
        vehicle::ActiveModel {
            id: NotSet,
            plate_number: Set(self.plate_number),
            brand: Set(self.brand),
            model: Set(self.model),
            year: Set(self.year),
            seats: Set(self.seats),
            transmission: Set(self.transmission),
            fuel_type: Set(self.fuel_type),
            daily_rental_fee: Set(self.daily_rental_fee),
            category_id: Set(self.category_id),
            location_id: Set(self.location_id),
            active: Set(self.active),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
    }
}

pub async fn link_features(
    db: &DatabaseConnection,
    vehicle_id: i32,
    feature_ids: &[i32],
) -> Result<(), DbErr> {
    for feature_id in feature_ids {
        vehicle_feature::ActiveModel {
            vehicle_id: Set(vehicle_id),
            feature_id: Set(*feature_id),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

pub async fn insert_user(
    db: &DatabaseConnection,
    full_name: &str,
    email: &str,
) -> Result<user::Model, DbErr> {
    user::ActiveModel {
        id: NotSet,
        full_name: Set(full_name.to_string()),
        email: Set(email.to_string()),
        phone: Set(None),
        role: Set(Role::Customer),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
}

pub async fn insert_rental(
    db: &DatabaseConnection,
    user_id: i32,
    vehicle: &vehicle::Model,
    start: &str,
    end: &str,
    status: RentalStatus,
) -> Result<rental::Model, DbErr> {
    let days = (date(end) - date(start)).num_days() as f64;
    rental::ActiveModel {
        id: NotSet,
        reference: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        vehicle_id: Set(vehicle.id),
        pickup_location_id: Set(vehicle.location_id),
        return_location_id: Set(vehicle.location_id),
        start_date: Set(date(start)),
        end_date: Set(date(end)),
        total_price: Set(days * vehicle.daily_rental_fee),
        status: Set(status),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> Response<Body> {
    request_json(app, "POST", uri, body).await
}

pub async fn request_json(app: &Router, method: &str, uri: &str, body: &Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// `/vehicles?filter=...` with the filter JSON percent-encoded.
pub fn with_filter(path: &str, filter: &Value, extra: &str) -> String {
    let encoded = url_escape::encode_component(&filter.to_string()).to_string();
    if extra.is_empty() {
        format!("{path}?filter={encoded}")
    } else {
        format!("{path}?filter={encoded}&{extra}")
    }
}
