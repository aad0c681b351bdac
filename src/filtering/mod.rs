//! # Search Pipeline
//!
//! Turns the query parameters of a list endpoint into a single storage query:
//! typed criteria become a conjunctive [`Condition`](sea_orm::Condition), the
//! requested ordering is checked against a per-resource allow-list and
//! tie-broken by id, and the page window is validated before anything runs.
//!
//! ## Main Components
//!
//! - **[`Criteria`]**: strict parsing of the `filter` JSON into [`VehicleCriteria`] / [`RentalCriteria`]
//! - **[`parse_sorting`] / [`resolve_sort`]**: ordering with a deterministic id tie-break
//! - **[`PageRequest`] / [`Page`]**: page validation, totals and `Content-Range`
//! - **[`contains_ignore_case`]**: literal, case-insensitive substring matching
//!
//! ## Query Parameter Examples
//!
//! ```text
//! GET /vehicles?filter={"minDailyRentalFee":100,"maxDailyRentalFee":300,"locationId":2}
//! GET /vehicles?filter={"featureIds":[1,3],"availableFrom":"2025-06-01","availableTo":"2025-06-05"}
//! GET /vehicles?sort=["dailyRentalFee","DESC"]&page=2&per_page=5
//! GET /rentals?filter={"status":"Confirmed","search":"ada"}&sort_by=startDate&order=desc
//! ```

pub mod conditions;
pub mod criteria;
pub mod pagination;
pub mod search;
pub mod sort;

pub use conditions::confirmed_rentals_overlapping;
pub use criteria::{
    Criteria, DateWindow, RentalCriteria, VehicleCriteria, parse_criteria, parse_filter_json,
};
pub use pagination::{Page, PageRequest, calculate_content_range};
pub use search::{contains_any, contains_ignore_case, escape_like_wildcards};
pub use sort::{SortDirection, SortSpec, parse_sorting, resolve_sort};
