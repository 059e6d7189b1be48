//! Uniform response envelope returned by every gateway operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `{ success, data, error, meta }` wrapper around a gateway result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub meta: ResponseMeta,
}

impl<T> ApiResponse<T> {
    /// Successful response stamped with the current time.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: ResponseMeta::now(),
        }
    }

    /// Failed response carrying a human-readable error.
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            meta: ResponseMeta::now(),
        }
    }

    pub fn with_page(mut self, page: PageMeta) -> Self {
        self.meta.page = Some(page);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.meta.message = Some(message.into());
        self
    }

    /// Re-wrap a failure for a different payload type, keeping its metadata.
    pub fn cast_failure<U>(self) -> ApiResponse<U> {
        ApiResponse {
            success: false,
            data: None,
            error: self.error,
            meta: self.meta,
        }
    }

    /// Converts into a `Result`, treating a missing payload on success as an error.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("response carried no data".to_string()),
            (false, _) => Err(self.error.unwrap_or_else(|| "An unexpected error occurred".to_string())),
        }
    }
}

/// Envelope metadata. Pagination fields are flattened into the object so the
/// JSON shape matches `{ timestamp, total, page, limit, totalPages }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub page: Option<PageMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResponseMeta {
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now(),
            page: None,
            message: None,
        }
    }
}

/// Pagination summary for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

impl PageMeta {
    /// Builds the summary for `total` items split into pages of `limit`.
    pub fn new(total: usize, page: usize, limit: usize) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }
}
