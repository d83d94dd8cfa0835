// web_app/error.rs - Error taxonomy for the admin client
//
// Three kinds of failure reach the UI: the request never completed (transport),
// the backend answered with a non-success status, or the input was rejected
// locally before any request. All of them end up as one human-readable message.

use thiserror::Error;

use crate::web_app::model::ProductId;

/// Failure while talking to the REST backend
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not complete (connection refused, DNS, aborted fetch...)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// The backend answered successfully but the body was not what we expected
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a backend error from a status code and the raw response body
    pub fn from_response(status: u16, body: &str) -> Self {
        ApiError::Backend {
            status,
            message: backend_message(status, body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Backend {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Extract the most useful message from an error body
///
/// Looks at `message`, then `detail`, then the first field-level error in body
/// order (`{"name": ["This field is required."]}`), falling back to the status code.
pub fn backend_message(status: u16, body: &str) -> String {
    let fallback = || format!("Request failed with status {status}");

    let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };

    for key in ["message", "detail"] {
        if let Some(serde_json::Value::String(text)) = map.get(key) {
            if !text.is_empty() {
                return text.clone();
            }
        }
    }

    map.iter()
        .find_map(|(field, value)| {
            let text = match value {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Array(items) => items.iter().find_map(|item| item.as_str().map(str::to_string)),
                _ => None,
            }?;
            Some(format!("{field}: {text}"))
        })
        .unwrap_or_else(fallback)
}

/// Input rejected before any request was issued
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be a number")]
    InvalidNumber { field: &'static str },
}

/// Any failure of a catalog list operation
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Product {0} is not in the loaded list")]
    NotLoaded(ProductId),
}
