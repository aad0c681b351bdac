use axum::http::header::HeaderMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::PaginationSettings;
use crate::models::FilterOptions;
use crate::validation::{ValidationError, ValidationErrors};

/// A validated page window. `offset()` always fits in an `i64`, which is what
/// the database drivers bind `OFFSET` as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// # Errors
    ///
    /// Rejects a page or size below 1, a size above `max_page_size` and a
    /// page whose offset exceeds `i64::MAX`.
    pub fn new(page: i64, page_size: i64, max_page_size: u64) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let page = u64::try_from(page)
            .ok()
            .filter(|page| *page >= 1)
            .ok_or_else(|| ValidationError::new("page", "must be at least 1"));
        let page = errors.check(page);

        let page_size = match u64::try_from(page_size).ok().filter(|size| *size >= 1) {
            None => Err(ValidationError::new("per_page", "must be at least 1")),
            Some(size) if size > max_page_size => Err(ValidationError::new(
                "per_page",
                format!("must be at most {max_page_size}"),
            )),
            Some(size) => Ok(size),
        };
        let page_size = errors.check(page_size);

        if let (Some(page), Some(page_size)) = (page, page_size)
            && (page - 1)
                .checked_mul(page_size)
                .and_then(|offset| i64::try_from(offset).ok())
                .is_none()
        {
            errors.add(ValidationError::new("page", "is too large"));
        }

        errors.result()?;
        match (page, page_size) {
            (Some(page), Some(page_size)) => Ok(Self { page, page_size }),
            _ => Err(ValidationError::new("page", "is invalid").into()),
        }
    }

    /// Reads `page`/`per_page`, filling in page 1 and the configured default size.
    ///
    /// # Errors
    ///
    /// See [`PageRequest::new`].
    pub fn from_params(
        params: &FilterOptions,
        settings: &PaginationSettings,
    ) -> Result<Self, ValidationErrors> {
        let default_size = i64::try_from(settings.default_page_size).unwrap_or(i64::MAX);
        Self::new(
            params.page.unwrap_or(1),
            params.per_page.unwrap_or(default_size),
            settings.max_page_size,
        )
    }

    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// `(page - 1) * page_size`, checked at construction.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// One page of results plus the totals needed to render a pager.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matches across all pages.
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
    /// `ceil(total_count / page_size)`; zero when nothing matched.
    pub total_pages: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_count,
            page: request.page,
            page_size: request.page_size,
            total_pages: total_count.div_ceil(request.page_size),
        }
    }

    /// Offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Builds the `Content-Range` header describing this page.
    #[must_use]
    pub fn content_range(&self, resource_name: &str) -> HeaderMap {
        calculate_content_range(
            self.offset(),
            self.items.len() as u64,
            self.total_count,
            resource_name,
        )
    }
}

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii() && !c.is_ascii_control()).collect()
}

/// Generates the `Content-Range` header for a page of results.
///
/// # Arguments
///
/// * `offset` - Index of the first returned item.
/// * `item_count` - Number of items actually returned.
/// * `total_count` - The total number of matching items.
/// * `resource_name` - The name of the resource being paginated.
///
/// An empty page (including one past the end) is rendered as `name */total`.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    item_count: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    // Sanitize resource name to prevent header injection
    let safe_name = sanitize_resource_name(resource_name);

    let content_range = if item_count == 0 {
        format!("{safe_name} */{total_count}")
    } else {
        let last = offset.saturating_add(item_count - 1);
        format!("{safe_name} {offset}-{last}/{total_count}")
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = content_range.parse() {
        headers.insert("Content-Range", value);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> PaginationSettings {
        PaginationSettings {
            default_page_size: 10,
            max_page_size: 100,
        }
    }

    fn header(headers: &HeaderMap) -> &str {
        headers.get("Content-Range").unwrap().to_str().unwrap()
    }

    #[test]
    fn test_defaults() {
        let request = PageRequest::from_params(&FilterOptions::default(), &settings()).unwrap();
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), 10);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_offset() {
        let request = PageRequest::new(3, 5, 100).unwrap();
        assert_eq!(request.offset(), 10);
        assert_eq!(request.limit(), 5);
    }

    #[test]
    fn test_invalid_requests() {
        assert!(PageRequest::new(0, 10, 100).is_err());
        assert!(PageRequest::new(-3, 10, 100).is_err());
        assert!(PageRequest::new(1, 0, 100).is_err());
        assert!(PageRequest::new(1, 101, 100).is_err());

        let both = PageRequest::new(0, 0, 100).unwrap_err();
        assert_eq!(both.len(), 2);
    }

    #[test]
    fn test_offset_overflow_is_rejected() {
        let err = PageRequest::new(i64::MAX, 100, 100).unwrap_err();
        assert_eq!(err.errors()[0].message, "is too large");

        // (2^60 + 1 - 1) * 8 = 2^63 fits in a u64 but not in an i64.
        let err = PageRequest::new(1_152_921_504_606_846_977, 8, 100).unwrap_err();
        assert_eq!(err.errors()[0].message, "is too large");
    }

    #[test]
    fn test_largest_offset_is_accepted() {
        let request = PageRequest::new(i64::MAX, 1, 100).unwrap();
        assert_eq!(request.offset(), u64::try_from(i64::MAX - 1).unwrap());

        let request = PageRequest::new(1_152_921_504_606_846_976, 8, 100).unwrap();
        assert_eq!(request.offset(), u64::try_from(i64::MAX).unwrap() - 7);
    }

    #[test]
    fn test_total_pages() {
        let request = PageRequest::new(1, 5, 100).unwrap();
        assert_eq!(Page::<u8>::new(vec![], 0, request).total_pages, 0);
        assert_eq!(Page::<u8>::new(vec![], 5, request).total_pages, 1);
        assert_eq!(Page::<u8>::new(vec![], 12, request).total_pages, 3);
    }

    #[test]
    fn test_content_range() {
        let headers = calculate_content_range(5, 5, 12, "vehicles");
        assert_eq!(header(&headers), "vehicles 5-9/12");

        let headers = calculate_content_range(10, 2, 12, "vehicles");
        assert_eq!(header(&headers), "vehicles 10-11/12");
    }

    #[test]
    fn test_content_range_past_the_end() {
        let page = Page::<u8>::new(vec![], 12, PageRequest::new(4, 5, 100).unwrap());
        assert_eq!(header(&page.content_range("vehicles")), "vehicles */12");
    }

    #[test]
    fn test_resource_name_is_sanitized() {
        let headers = calculate_content_range(0, 1, 1, "rentals\r\nX-Injected: 1");
        assert_eq!(header(&headers), "rentalsX-Injected: 1 0-0/1");
    }
}
