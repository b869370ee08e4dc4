//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cache::CacheError;
use crate::catalog::CatalogError;
use crate::orders::OrderStoreError;
use crate::services::checkout::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart cache operation failed.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Catalog lookup failed or timed out.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Order store operation failed.
    #[error("Order store error: {0}")]
    Orders(#[from] OrderStoreError),

    /// Checkout could not produce an order.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Session load/store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Server-side failures are captured to Sentry; client mistakes are not.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Cache(_) | Self::Catalog(_) | Self::Session(_) => true,
            Self::Orders(err) => !matches!(
                err,
                OrderStoreError::NotFound | OrderStoreError::InvalidTransition { .. }
            ),
            Self::Checkout(err) => !matches!(err, CheckoutError::EmptyCart),
            Self::NotFound(_) | Self::Unauthorized(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Cache(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Catalog(_) => StatusCode::BAD_GATEWAY,
            Self::Orders(err) => match err {
                OrderStoreError::NotFound => StatusCode::NOT_FOUND,
                OrderStoreError::InvalidTransition { .. } => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => StatusCode::CONFLICT,
                CheckoutError::Catalog(_) => StatusCode::BAD_GATEWAY,
                CheckoutError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Cache(_) | Self::Session(_) | Self::Checkout(CheckoutError::Store(_)) => {
                "Internal server error".to_string()
            }
            Self::Catalog(_) | Self::Checkout(CheckoutError::Catalog(_)) => {
                "Menu temporarily unavailable".to_string()
            }
            Self::Checkout(CheckoutError::EmptyCart) => "Your cart is empty".to_string(),
            Self::Orders(err) => match err {
                OrderStoreError::NotFound => "Order not found".to_string(),
                OrderStoreError::InvalidTransition { .. } => {
                    "Invalid order status transition".to_string()
                }
                _ => "Internal server error".to_string(),
            },
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 123".to_string());
        assert_eq!(err.to_string(), "Not found: order 123");

        let err = AppError::BadRequest("invalid quantity".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid quantity");

        let err = AppError::Checkout(CheckoutError::EmptyCart);
        assert_eq!(err.to_string(), "Checkout error: cart is empty");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Catalog(CatalogError::Timeout)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Orders(OrderStoreError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Cache(CacheError::Backend("down".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
