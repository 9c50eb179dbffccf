use crate::application::auth_service::AuthService;
use crate::application::expense_service::ExpenseService;
use crate::data::expense_repository::InMemoryExpenseRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::category::known_categories;
use crate::domain::error::DomainError;
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError};
use chrono::Utc;
use serde::Serialize;
use std::pin::Pin;
use thiserror::Error;
use tracing::{error, instrument, warn};

// Collaborators built once at startup and shared by every worker
pub struct AppState {
    pub auth_service: AuthService<InMemoryUserRepository>,
    pub expense_service: ExpenseService<InMemoryExpenseRepository>,
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Expired: {0}")]
    Expired(String),
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Expired(_) => "expired",
            ApiError::InvalidCredential(_) => "invalid_credential",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Internal(_) => "internal_error",
        }
    }

    /// What the client gets to read. Internal details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Expired(msg)
            | ApiError::InvalidCredential(msg)
            | ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::Internal(_) => "Server error".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::Conflict(_)
            | ApiError::Expired(_)
            | ApiError::InvalidCredential(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            ApiError::Internal(_) => {
                error!(error = %self, status = %status, "Internal error")
            }
            _ => warn!(error = %self, status = %status, "Request rejected"),
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind(),
            message: self.client_message(),
        })
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            DomainError::Expired(msg) => ApiError::Expired(msg),
            DomainError::InvalidCredential(msg) => ApiError::InvalidCredential(msg),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => ApiError::from(domain),
            // anything that is not a domain error is a collaborator failure
            Err(other) => ApiError::Internal(format!("{:#}", other)),
        }
    }
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move {
            user.ok_or_else(|| ApiError::Unauthorized("User not authenticated".to_string()))
        })
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

pub async fn list_categories() -> HttpResponse {
    HttpResponse::Ok().json(known_categories())
}
