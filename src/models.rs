use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

/// Query parameters for filtering, pagination, and sorting list endpoints.
///
/// # Filtering
/// The `filter` parameter accepts a JSON-encoded object of criteria. Keys are
/// resource-specific and camelCase; an unknown key is rejected rather than
/// ignored, for example:
/// ```json
/// {"minDailyRentalFee": 100, "maxDailyRentalFee": 300, "locationId": 2}
/// ```
///
/// # Pagination
/// `page` is 1-based; `per_page` falls back to the configured default and may
/// not exceed the configured maximum.
///
/// # Sorting
/// Either a JSON array with the field and direction:
/// ```json
/// ["dailyRentalFee", "DESC"]
/// ```
/// or a plain field name in `sort`/`sort_by` with the direction in `order`.
/// Results are always tie-broken by ascending id.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct FilterOptions {
    /// JSON-encoded criteria object.
    #[param(example = json!({
        "minDailyRentalFee": 100,
        "maxDailyRentalFee": 300,
        "locationId": 2
    }))]
    pub filter: Option<String>,
    /// Sort order in the format '["field", "direction"]' or a bare field name.
    ///
    /// Example: `["dailyRentalFee", "ASC"]`
    #[param(example = r#"["dailyRentalFee", "ASC"]"#)]
    pub sort: Option<String>,
    /// Field to sort by, used together with `order`.
    #[param(example = "year")]
    pub sort_by: Option<String>,
    /// `ASC`/`DESC` (also `ascending`/`descending`, any case).
    #[param(example = "DESC")]
    pub order: Option<String>,
    /// Page number (1-based).
    #[param(example = 1)]
    pub page: Option<i64>,
    /// Number of items per page.
    #[param(example = 10)]
    pub per_page: Option<i64>,
}
