use crate::error::LedgerError;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

impl From<PathRejection> for LedgerError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for LedgerError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl LedgerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::NotFound(_) | LedgerError::NoData => StatusCode::NOT_FOUND,
            LedgerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            LedgerError::InsufficientFunds { .. } | LedgerError::DepositLimitExceeded { .. } => {
                StatusCode::PAYMENT_REQUIRED
            }
            LedgerError::AlreadyPaid(_) => StatusCode::CONFLICT,
            LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            LedgerError::TransactionFailed(_)
            | LedgerError::Conflict(_)
            | LedgerError::Csv(_)
            | LedgerError::Io(_)
            | LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors leave as a bare status code; server-side failures are logged here.
impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        status.into_response()
    }
}
