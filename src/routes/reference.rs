use axum::{Json, extract::State, http::StatusCode};
use sea_orm::{EntityTrait, IntoActiveModel};

use crate::core::traits::{CreatableResource, Resource};
use crate::errors::ApiError;
use crate::resources::{Category, Feature, Location, LocationCreate, NamedCreate};
use crate::state::AppState;
use crate::validation::Validatable;

async fn create<R>(state: &AppState, payload: R::CreateModel) -> Result<(StatusCode, Json<R>), ApiError>
where
    R: CreatableResource + From<<R::EntityType as EntityTrait>::Model>,
    <R::EntityType as EntityTrait>::Model: IntoActiveModel<R::ActiveModelType>,
{
    payload
        .validate()
        .map_err(|e| ApiError::validation_failed(e.messages()))?;
    let created = R::create(&state.db, payload).await?;
    tracing::info!(resource = R::RESOURCE_NAME_SINGULAR, "Reference data created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/categories",
    responses((status = axum::http::StatusCode::OK, description = "All categories", body = [Category])),
    tag = "reference",
    summary = "List vehicle categories"
)]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(Category::list_all(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/categories",
    request_body = NamedCreate,
    responses(
        (status = axum::http::StatusCode::CREATED, description = "Category created", body = Category),
        (status = axum::http::StatusCode::CONFLICT, description = "Name already exists"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload")
    ),
    tag = "reference",
    summary = "Create a vehicle category"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<NamedCreate>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    create::<Category>(&state, payload).await
}

#[utoipa::path(
    get,
    path = "/locations",
    responses((status = axum::http::StatusCode::OK, description = "All rental locations", body = [Location])),
    tag = "reference",
    summary = "List rental locations"
)]
pub async fn list_locations(State(state): State<AppState>) -> Result<Json<Vec<Location>>, ApiError> {
    Ok(Json(Location::list_all(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/locations",
    request_body = LocationCreate,
    responses(
        (status = axum::http::StatusCode::CREATED, description = "Location created", body = Location),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload")
    ),
    tag = "reference",
    summary = "Create a rental location"
)]
pub async fn create_location(
    State(state): State<AppState>,
    Json(payload): Json<LocationCreate>,
) -> Result<(StatusCode, Json<Location>), ApiError> {
    create::<Location>(&state, payload).await
}

#[utoipa::path(
    get,
    path = "/features",
    responses((status = axum::http::StatusCode::OK, description = "All vehicle features", body = [Feature])),
    tag = "reference",
    summary = "List vehicle features"
)]
pub async fn list_features(State(state): State<AppState>) -> Result<Json<Vec<Feature>>, ApiError> {
    Ok(Json(Feature::list_all(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/features",
    request_body = NamedCreate,
    responses(
        (status = axum::http::StatusCode::CREATED, description = "Feature created", body = Feature),
        (status = axum::http::StatusCode::CONFLICT, description = "Name already exists"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload")
    ),
    tag = "reference",
    summary = "Create a vehicle feature"
)]
pub async fn create_feature(
    State(state): State<AppState>,
    Json(payload): Json<NamedCreate>,
) -> Result<(StatusCode, Json<Feature>), ApiError> {
    create::<Feature>(&state, payload).await
}
