use sea_orm::{ColumnTrait, sea_query::Order};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::FilterOptions;
use crate::validation::ValidationError;

const MAX_ECHOED_FIELD_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Accepts `asc`, `ascending`, `desc` and `descending` in any case.
    ///
    /// # Errors
    ///
    /// Any other label is rejected.
    pub fn parse(label: &str) -> Result<Self, ValidationError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(ValidationError::new(
                "order",
                format!("unsupported sort direction '{}'", truncate(label)),
            )),
        }
    }

    #[must_use]
    pub fn order(self) -> Order {
        match self {
            Self::Ascending => Order::Asc,
            Self::Descending => Order::Desc,
        }
    }
}

/// A requested ordering: public field name plus direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_ECHOED_FIELD_LENGTH).collect()
}

fn direction_or_default(order: Option<&str>) -> Result<SortDirection, ValidationError> {
    order.map_or(Ok(SortDirection::Ascending), SortDirection::parse)
}

/// Parse sort column and direction from the JSON array format `["field", "DESC"]`.
fn parse_json_sort(json: &str) -> Result<SortSpec, ValidationError> {
    let parts: Vec<String> = serde_json::from_str(json).map_err(|_| {
        ValidationError::new(
            "sort",
            "must be a JSON array like [\"field\", \"ASC\"] or a field name",
        )
    })?;
    match parts.as_slice() {
        [field] => Ok(SortSpec::ascending(field.as_str())),
        [field, direction] => Ok(SortSpec::new(field.as_str(), SortDirection::parse(direction)?)),
        _ => Err(ValidationError::new(
            "sort",
            "must name one field and optionally a direction",
        )),
    }
}

/// Parse sorting from `FilterOptions`, supporting both the JSON array and the
/// `sort_by`/`order` formats. `None` means the default ordering.
///
/// # Errors
///
/// Malformed sort JSON, unknown directions and `sort` given together with
/// `sort_by` are rejected.
pub fn parse_sorting(params: &FilterOptions) -> Result<Option<SortSpec>, ValidationError> {
    if let Some(sort_by) = params.sort_by.as_deref().filter(|s| !s.trim().is_empty()) {
        if params.sort.as_deref().is_some_and(|s| !s.trim().is_empty()) {
            return Err(ValidationError::new("sort_by", "cannot be combined with sort"));
        }
        let direction = direction_or_default(params.order.as_deref())?;
        return Ok(Some(SortSpec::new(sort_by.trim(), direction)));
    }

    let Some(sort) = params.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        // A lone direction still has to be valid.
        direction_or_default(params.order.as_deref())?;
        return Ok(None);
    };

    if sort.starts_with('[') {
        parse_json_sort(sort).map(Some)
    } else {
        let direction = direction_or_default(params.order.as_deref())?;
        Ok(Some(SortSpec::new(sort, direction)))
    }
}

/// Maps a requested ordering onto the resource's sortable columns and appends
/// ascending `id_column` as a tie-breaker, so every page boundary is
/// deterministic.
///
/// # Errors
///
/// Returns "unsupported sort field" for any name outside `allowed`.
pub fn resolve_sort<C>(
    spec: Option<&SortSpec>,
    allowed: &[(&str, C)],
    id_column: C,
) -> Result<Vec<(C, Order)>, ValidationError>
where
    C: ColumnTrait + Copy,
{
    let Some(spec) = spec else {
        return Ok(vec![(id_column, Order::Asc)]);
    };

    let column = allowed
        .iter()
        .find(|&&(name, _)| name == spec.field)
        .map(|&(_, column)| column)
        .ok_or_else(|| {
            ValidationError::new(
                "sort",
                format!("unsupported sort field '{}'", truncate(&spec.field)),
            )
        })?;

    let mut ordering = vec![(column, spec.direction.order())];
    if column.as_str() != id_column.as_str() {
        ordering.push((id_column, Order::Asc));
    }
    Ok(ordering)
}
