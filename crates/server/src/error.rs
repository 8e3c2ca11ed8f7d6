//! API error taxonomy — modeled on the teacher's `ApiError` (sanitize-on-response,
//! keep the cause for logs only).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),

    #[error("invalid port format: {0}")]
    InvalidPortFormat(String),

    #[error("too many ports: {0}")]
    TooManyPorts(String),

    #[error("port conflict: {0}")]
    PortConflict(String),

    #[error("instance not running: {0}")]
    InstanceNotRunning(String),

    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("object too large: {0}")]
    ObjectTooLarge(String),

    #[error("load balancer not found: {0}")]
    LbNotFound(String),

    #[error("target already registered: {0}")]
    LbTargetExists(String),

    #[error("target must be in same vpc as load balancer")]
    LbCrossVpc,

    #[error("internal error: {0}")]
    Internal(String),

    /// Wraps a lower-layer cause. The cause is logged, never serialized.
    #[error("{kind_message}")]
    Wrapped {
        kind_message: String,
        code: &'static str,
        status: StatusCode,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApiError {
    pub fn wrap(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ApiError::Wrapped {
            kind_message: message.into(),
            code,
            status,
            cause: Box::new(cause),
        }
    }

    pub fn internal(cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::wrap(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
            "an internal error occurred",
            cause,
        )
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::ResourceLimitExceeded(_) => "RESOURCE_LIMIT_EXCEEDED",
            ApiError::InvalidPortFormat(_) => "INVALID_PORT_FORMAT",
            ApiError::TooManyPorts(_) => "TOO_MANY_PORTS",
            ApiError::PortConflict(_) => "PORT_CONFLICT",
            ApiError::InstanceNotRunning(_) => "INSTANCE_NOT_RUNNING",
            ApiError::BucketNotFound(_) => "BUCKET_NOT_FOUND",
            ApiError::ObjectNotFound(_) => "OBJECT_NOT_FOUND",
            ApiError::ObjectTooLarge(_) => "OBJECT_TOO_LARGE",
            ApiError::LbNotFound(_) => "LB_NOT_FOUND",
            ApiError::LbTargetExists(_) => "LB_TARGET_EXISTS",
            ApiError::LbCrossVpc => "LB_CROSS_VPC",
            ApiError::Internal(_) => "INTERNAL",
            ApiError::Wrapped { code, .. } => code,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_)
            | ApiError::BucketNotFound(_)
            | ApiError::ObjectNotFound(_)
            | ApiError::LbNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_)
            | ApiError::InvalidPortFormat(_)
            | ApiError::TooManyPorts(_)
            | ApiError::ObjectTooLarge(_)
            | ApiError::LbCrossVpc
            | ApiError::InstanceNotRunning(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) | ApiError::PortConflict(_) | ApiError::LbTargetExists(_) => {
                StatusCode::CONFLICT
            }
            ApiError::ResourceLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Wrapped { status, .. } => *status,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: &'static str,
    message: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Wrapped { ref cause, .. } = self {
            tracing::error!(error = %cause, "wrapped internal error");
        }
        let status = self.status();
        let code = self.code();
        let body = ErrorBody {
            kind: code,
            message: self.to_string(),
            code,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("entity not found".into()),
            other => ApiError::wrap(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "a database error occurred",
                other,
            ),
        }
    }
}

