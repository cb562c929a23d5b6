//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use roster_core::types::pagination::PageRequest;

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 25, max: 100).
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    25
}

impl PaginationParams {
    /// Converts to a `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_on_empty_query() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        let page = params.into_page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 25);
    }

    #[test]
    fn test_oversized_per_page_clamped() {
        let params = PaginationParams {
            page: 2,
            per_page: 9999,
        };
        assert_eq!(params.into_page_request().page_size, 100);
    }
}
