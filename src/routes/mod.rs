//! HTTP surface. Every route is registered through `utoipa-axum` so the
//! OpenAPI document served at `/docs` always matches the router.

pub mod health;
pub mod reference;
pub mod rentals;
pub mod users;
pub mod vehicles;

use axum::{Json, Router, http::HeaderMap};
use sea_orm::EntityTrait;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_scalar::{Scalar, Servable};

use crate::core::traits::SearchResource;
use crate::errors::ApiError;
use crate::filtering::{Page, PageRequest, parse_criteria, parse_sorting, resolve_sort};
use crate::models::FilterOptions;
use crate::state::AppState;
use crate::validation::ValidationErrors;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "fleetdesk",
        description = "Car-rental search and booking API"
    ),
    tags(
        (name = "vehicles", description = "Fleet search and back-office management"),
        (name = "rentals", description = "Bookings, payments and their lifecycle"),
        (name = "users", description = "Customer accounts"),
        (name = "reference", description = "Categories, locations and features"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

/// Parses criteria, sort and page together so that every problem in the
/// request is reported at once, then runs the search.
pub(crate) async fn search<R>(
    state: &AppState,
    params: &FilterOptions,
) -> Result<(HeaderMap, Json<Page<R>>), ApiError>
where
    R: SearchResource + From<<R::EntityType as EntityTrait>::Model>,
    <R::EntityType as EntityTrait>::Model: Sync,
{
    let mut errors = ValidationErrors::new();

    let criteria = match parse_criteria::<R::Criteria>(params.filter.as_deref()) {
        Ok(criteria) => Some(criteria),
        Err(e) => {
            errors.merge(e);
            None
        }
    };
    let sort = errors.check(parse_sorting(params));
    if let Some(Some(spec)) = &sort {
        errors.check(resolve_sort(Some(spec), &R::sortable_columns(), R::ID_COLUMN));
    }
    let page = match PageRequest::from_params(params, &state.settings.pagination) {
        Ok(page) => Some(page),
        Err(e) => {
            errors.merge(e);
            None
        }
    };

    let (Some(criteria), Some(sort), Some(page)) = (criteria, sort, page) else {
        return Err(errors.into());
    };

    let page = R::search(&state.db, &criteria, sort.as_ref(), page).await?;
    let headers = page.content_range(R::RESOURCE_NAME_PLURAL);
    Ok((headers, Json(page)))
}

/// All routes plus the interactive API reference at `/docs`.
pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::<AppState>::with_openapi(ApiDoc::openapi())
        .routes(routes!(health::health_check))
        .routes(routes!(vehicles::list_vehicles, vehicles::create_vehicle))
        .routes(routes!(
            vehicles::get_vehicle,
            vehicles::update_vehicle,
            vehicles::delete_vehicle
        ))
        .routes(routes!(rentals::list_rentals, rentals::book_rental))
        .routes(routes!(rentals::get_rental))
        .routes(routes!(rentals::cancel_rental))
        .routes(routes!(rentals::complete_rental))
        .routes(routes!(rentals::pay_rental, rentals::list_payments))
        .routes(routes!(users::register_user))
        .routes(routes!(users::get_user, users::update_user))
        .routes(routes!(reference::list_categories, reference::create_category))
        .routes(routes!(reference::list_locations, reference::create_location))
        .routes(routes!(reference::list_features, reference::create_feature))
        .with_state(state)
        .split_for_parts();

    router.merge(Scalar::with_url("/docs", api))
}
