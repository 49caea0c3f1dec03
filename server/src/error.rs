use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use serde::Serialize;
use tracing::{debug, error};

use kernel::{KernelError, ReportExt};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: u16,
    errors: Vec<String>,
}

fn status_of(error: &KernelError) -> StatusCode {
    match error {
        KernelError::NotFound => StatusCode::NOT_FOUND,
        KernelError::Validation | KernelError::BusinessRule => StatusCode::BAD_REQUEST,
        KernelError::Conflict | KernelError::Concurrency => StatusCode::CONFLICT,
        KernelError::Unauthorized => StatusCode::UNAUTHORIZED,
        KernelError::Forbidden => StatusCode::FORBIDDEN,
        KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
        KernelError::Configuration | KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let context = self.0.current_context();
        let status = status_of(context);
        // server-side failures never leak their detail
        let errors = if status.is_server_error() {
            error!("{:?}", self.0);
            vec!["Internal server error".to_string()]
        } else {
            debug!("{:?}", self.0);
            let messages = self.0.messages();
            if messages.is_empty() {
                vec![context.to_string()]
            } else {
                messages
            }
        };
        let body = ErrorBody {
            status: status.as_u16(),
            errors,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use error_stack::Report;
    use serde_json::{json, Value};

    use kernel::{FieldViolation, KernelError};

    use super::ErrorStatus;

    async fn render(status: ErrorStatus) -> (StatusCode, Value) {
        let response = status.into_response();
        let code = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (code, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_carry_their_messages() {
        let report = Report::new(KernelError::Validation)
            .attach_printable(FieldViolation::new("title", "Title must not be blank"));
        let (code, body) = render(ErrorStatus::from(report)).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"status": 400, "errors": ["title: Title must not be blank"]})
        );

        let (code, body) = render(ErrorStatus::from(Report::new(KernelError::NotFound))).await;
        assert_eq!(code, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"], json!(["Entity not found"]));
    }

    #[tokio::test]
    async fn server_errors_stay_generic() {
        let report = KernelError::Configuration.with_message("No provider for key: title");
        let (code, body) = render(ErrorStatus::from(report)).await;
        assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errors"], json!(["Internal server error"]));
    }

    #[tokio::test]
    async fn every_kind_has_a_status() {
        for (error, expected) in [
            (KernelError::BusinessRule, StatusCode::BAD_REQUEST),
            (KernelError::Conflict, StatusCode::CONFLICT),
            (KernelError::Concurrency, StatusCode::CONFLICT),
            (KernelError::Unauthorized, StatusCode::UNAUTHORIZED),
            (KernelError::Forbidden, StatusCode::FORBIDDEN),
            (KernelError::Timeout, StatusCode::REQUEST_TIMEOUT),
            (KernelError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ] {
            let (code, _) = render(ErrorStatus::from(Report::new(error))).await;
            assert_eq!(code, expected);
        }
    }
}
