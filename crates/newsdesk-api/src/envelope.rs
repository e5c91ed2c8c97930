//! Response envelopes shared by all endpoints.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

const fn default_success() -> bool {
    true
}

/// Single-resource envelope: `{success, data, message?}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the backend considers the call successful.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Payload.
    pub data: T,
    /// Optional backend message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwraps the payload, turning `success: false` into an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::rejected`] when the envelope reports failure.
    pub fn into_data(self) -> Result<T> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::rejected(self.message))
        }
    }
}

/// Envelope for calls that carry no payload (logout, cancel, retry).
///
/// An empty 2xx body counts as [`Acknowledgement::default`], which is a success.
#[derive(Debug, Clone, Deserialize)]
pub struct Acknowledgement {
    /// Whether the backend considers the call successful.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Optional backend message.
    #[serde(default)]
    pub message: Option<String>,
}

impl Default for Acknowledgement {
    fn default() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}

impl Acknowledgement {
    /// Reads an optional body; `None` means the backend sent no content.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::rejected`] when the envelope reports failure.
    pub fn from_body(body: Option<Self>) -> Result<Option<String>> {
        body.unwrap_or_default().into_message()
    }

    /// Converts to the backend message, turning `success: false` into an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::rejected`] when the envelope reports failure.
    pub fn into_message(self) -> Result<Option<String>> {
        if self.success {
            Ok(self.message)
        } else {
            Err(ApiError::rejected(self.message))
        }
    }
}

/// Navigation links carried by some paginated responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageLinks {
    /// First page URL.
    #[serde(default)]
    pub first: Option<String>,
    /// Last page URL.
    #[serde(default)]
    pub last: Option<String>,
    /// Previous page URL.
    #[serde(default)]
    pub prev: Option<String>,
    /// Next page URL.
    #[serde(default)]
    pub next: Option<String>,
}

/// Paginated list envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Paginated<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// 1-based current page.
    pub current_page: u32,
    /// Last available page.
    pub last_page: u32,
    /// Page size.
    pub per_page: u32,
    /// Total items across pages.
    pub total: u64,
    /// Index of the first item on this page.
    #[serde(default)]
    pub from: Option<u64>,
    /// Index of the last item on this page.
    #[serde(default)]
    pub to: Option<u64>,
    /// Navigation links, when the backend sends them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<PageLinks>,
}

impl<T> Paginated<T> {
    /// Returns true if a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    /// Returns true if an earlier page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Returns true if the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
