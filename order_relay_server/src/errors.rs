use accounting_client::AccountingApiError;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use thiserror::Error;

use crate::data_objects::{InternalError, OrderDataError, RequestDataError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid request data. {}", .0.join(", "))]
    InvalidRequestData(Vec<String>),
    #[error("Invalid order data. {0}")]
    InvalidOrderData(String),
    #[error("Could not forward transaction. {0}")]
    ForwardingFailed(#[from] AccountingApiError),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

/// The last line of defense: any error that escapes a handler is rendered as one of the JSON
/// bodies the upstream provider understands, never as a stack trace or a plain-text 500.
impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestData(_) => StatusCode::BAD_REQUEST,
            Self::InvalidOrderData(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ForwardingFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        builder.insert_header(ContentType::json());
        match self {
            Self::InvalidRequestData(details) => builder.json(RequestDataError::new(details.clone())),
            Self::InvalidOrderData(message) => builder.json(OrderDataError::new(message)),
            _ => builder.json(InternalError::unexpected()),
        }
    }
}

#[cfg(test)]
mod test {
    use actix_web::{body::MessageBody, error::ResponseError, http::StatusCode};

    use super::ServerError;

    #[test]
    fn forwarding_failures_render_a_generic_500() {
        let err = ServerError::ForwardingFailed(accounting_client::AccountingApiError::Timeout);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.error_response().into_body().try_into_bytes().unwrap();
        let body = String::from_utf8_lossy(&body);
        assert!(body.contains("Internal server error"));
        assert!(!body.contains("timeout"));
    }

    #[test]
    fn invalid_request_data_renders_all_details() {
        let err = ServerError::InvalidRequestData(vec!["a is wrong".into(), "b is wrong".into()]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = err.error_response().into_body().try_into_bytes().unwrap();
        let body = String::from_utf8_lossy(&body);
        assert!(body.contains("a is wrong") && body.contains("b is wrong"));
    }
}
