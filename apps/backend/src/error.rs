use actix_web::error::ResponseError;
use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::auth::error::AuthError;
use crate::auth::issuer::IssueError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::errors::ErrorCode;
use crate::providers::RegisterError;
use crate::trace_ctx;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub code: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("unauthorized ({code}): {detail}")]
    Unauthorized { code: ErrorCode, detail: String },
    #[error("forbidden: {detail}")]
    Forbidden { detail: String },
    #[error("bad request ({code}): {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("not found ({code}): {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("conflict ({code}): {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("persistence error: {detail}")]
    Persistence { detail: String },
    #[error("internal error: {detail}")]
    Internal { detail: String },
    #[error("configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Unauthorized { code, .. }
            | AppError::BadRequest { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. } => *code,
            AppError::Forbidden { .. } => ErrorCode::Forbidden,
            AppError::Persistence { .. } => ErrorCode::PersistenceError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Config { .. } => ErrorCode::ConfigurationError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Persistence { .. } | AppError::Internal { .. } | AppError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to clients. Server-side failures get a generic text.
    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized { code, .. } => match code {
                ErrorCode::MalformedHeader => "Missing or malformed Authorization header",
                ErrorCode::MissingToken => "No token provided",
                ErrorCode::TokenExpired => "Token expired",
                ErrorCode::ProviderVerificationFailed => "Identity provider verification failed",
                _ => "Invalid token",
            }
            .to_string(),
            AppError::Forbidden { detail }
            | AppError::BadRequest { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. } => detail.clone(),
            AppError::Persistence { .. } => "Service temporarily unavailable, please retry".to_string(),
            AppError::Internal { .. } | AppError::Config { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn missing_field(field: &str) -> Self {
        Self::bad_request(ErrorCode::MissingField, format!("{field} is required"))
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MalformedHeader
            | AuthError::MissingToken
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::ProviderVerificationFailed(_) => AppError::Unauthorized {
                code: e.code(),
                detail: e.to_string(),
            },
            AuthError::PersistenceError(detail) => AppError::Persistence { detail },
            AuthError::Forbidden(detail) => AppError::Forbidden { detail },
            AuthError::InvalidSelfReference(detail) => {
                AppError::bad_request(ErrorCode::InvalidSelfReference, detail)
            }
            AuthError::MissingField(field) => AppError::missing_field(field),
            AuthError::InvalidUserId(_) => AppError::bad_request(e.code(), e.to_string()),
            AuthError::ConfigurationError(detail) => AppError::Config { detail },
        }
    }
}

impl From<IssueError> for AppError {
    fn from(e: IssueError) -> Self {
        match e {
            IssueError::Auth(auth) => auth.into(),
            IssueError::InvalidEmail(email) => {
                AppError::bad_request(ErrorCode::InvalidEmail, email.to_string())
            }
        }
    }
}

impl From<RegisterError> for AppError {
    fn from(e: RegisterError) -> Self {
        match e {
            RegisterError::InvalidEmail(email) => {
                AppError::bad_request(ErrorCode::InvalidEmail, email.to_string())
            }
            RegisterError::WeakPassword(_) => {
                AppError::bad_request(ErrorCode::ValidationError, e.to_string())
            }
            RegisterError::Store(domain) => domain.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(detail) => {
                AppError::bad_request(ErrorCode::ValidationError, detail)
            }
            DomainError::Conflict(ConflictKind::ProfileExists, _) => AppError::Conflict {
                code: ErrorCode::ProfileExists,
                detail: "Profile already exists".to_string(),
            },
            DomainError::Conflict(_, detail) => AppError::Conflict {
                code: ErrorCode::Conflict,
                detail,
            },
            DomainError::NotFound(NotFoundKind::User, _) => {
                AppError::not_found(ErrorCode::UserNotFound, "User not found")
            }
            DomainError::NotFound(NotFoundKind::Profile, _) => {
                AppError::not_found(ErrorCode::ProfileNotFound, "Profile not found")
            }
            DomainError::NotFound(_, _) => AppError::not_found(ErrorCode::NotFound, "Not found"),
            DomainError::Infra(kind, detail) => AppError::Persistence {
                detail: format!("{kind:?}: {detail}"),
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            error!(trace_id = %trace_id, code = self.code().as_str(), error = %self, "request failed");
        }

        let mut response = HttpResponse::build(status);
        response.insert_header(("x-trace-id", trace_id));
        if status == StatusCode::UNAUTHORIZED {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        response.json(ErrorBody {
            success: false,
            error: self.public_message(),
            code: self.code().as_str().to_string(),
        })
    }
}
