//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use titan_app::domain::products::ProductsServiceError;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Product already exists")
        }
        ProductsServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Name and category are required")
        }
        ProductsServiceError::InvalidReference | ProductsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid product payload")
        }
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::Sql(source) => {
            error!("product storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn client_errors_keep_their_meaning() {
        let cases = [
            (ProductsServiceError::AlreadyExists, StatusCode::CONFLICT),
            (ProductsServiceError::MissingRequiredData, StatusCode::BAD_REQUEST),
            (ProductsServiceError::InvalidData, StatusCode::BAD_REQUEST),
            (ProductsServiceError::NotFound, StatusCode::NOT_FOUND),
        ];

        for (error, expected) in cases {
            assert_eq!(into_status_error(error).code, expected);
        }
    }
}
