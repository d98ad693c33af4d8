//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::body::to_bytes;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Error::invalid_request("rating must be an integer between 1 and 5"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("Invalid credentials"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("admin access required"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("Book not found"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("Username already exists"), StatusCode::CONFLICT)]
    #[case(Error::service_unavailable("store offline"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_their_http_statuses(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[tokio::test]
    async fn internal_errors_are_redacted_in_the_body() {
        let error = Error::internal("database password rejected");
        let response = error.error_response();

        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");

        assert_eq!(json["code"], "internal_error");
        assert_eq!(json["message"], "Internal server error");
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let error = Error::not_found("Book not found");
        let response = error.error_response();

        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");

        assert_eq!(json["message"], "Book not found");
    }

    #[tokio::test]
    async fn responses_carry_the_trace_header_when_present() {
        let error = Error::internal("boom").with_trace_id("trace-1234");
        let response = error.error_response();

        let header = response
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace header present");
        assert_eq!(header, "trace-1234");
    }

    #[rstest]
    fn promoted_actix_errors_are_generic() {
        let promoted = Error::from(actix_web::error::ErrorImATeapot("leaky abstraction"));
        assert_eq!(promoted.code(), ErrorCode::InternalError);
        assert_eq!(promoted.message(), "Internal server error");
    }
}
