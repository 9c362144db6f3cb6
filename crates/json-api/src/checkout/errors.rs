//! Checkout Errors

use std::error::Error as _;

use salvo::http::StatusCode;
use tracing::{error, warn};

use titan_app::domain::checkout::CheckoutError;

pub(crate) fn status_code(error: &CheckoutError) -> StatusCode {
    match error {
        CheckoutError::Unauthorized => StatusCode::UNAUTHORIZED,
        CheckoutError::EmailNotVerified => StatusCode::FORBIDDEN,
        CheckoutError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        CheckoutError::ProductNotFound(_) => StatusCode::NOT_FOUND,
        CheckoutError::InsufficientStock { .. } => StatusCode::CONFLICT,
        CheckoutError::Persistence(_) | CheckoutError::Identity(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Internal failures are logged with their cause; the customer only sees the
/// generic message.
pub(crate) fn log_failure(error: &CheckoutError) {
    match error {
        CheckoutError::Persistence(_) | CheckoutError::Identity(_) => {
            let cause = error
                .source()
                .map_or_else(|| error.to_string(), ToString::to_string);

            error!(kind = error.kind(), cause = %cause, "checkout failed");
        }
        _ => warn!(kind = error.kind(), reason = %error, "checkout rejected"),
    }
}

#[cfg(test)]
mod tests {
    use titan_app::domain::{
        checkout::InvalidCheckout, products::records::ProductUuid, users::UsersServiceError,
    };

    use super::*;

    #[test]
    fn every_error_has_its_status() {
        let cases = [
            (CheckoutError::Unauthorized, StatusCode::UNAUTHORIZED),
            (CheckoutError::EmailNotVerified, StatusCode::FORBIDDEN),
            (
                CheckoutError::InvalidRequest(InvalidCheckout::EmptyCart),
                StatusCode::BAD_REQUEST,
            ),
            (
                CheckoutError::ProductNotFound(ProductUuid::new()),
                StatusCode::NOT_FOUND,
            ),
            (
                CheckoutError::InsufficientStock {
                    product: ProductUuid::new(),
                    name: "Whey".to_string(),
                    requested: 3,
                    available: 2,
                },
                StatusCode::CONFLICT,
            ),
            (
                CheckoutError::Identity(UsersServiceError::InvalidData),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(status_code(&error), expected, "wrong status for {error:?}");
        }
    }
}
