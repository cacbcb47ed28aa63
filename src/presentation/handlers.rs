use crate::application::auth_service::AuthService;
use crate::application::child_service::ChildService;
use crate::application::trip_service::TripService;
use crate::data::memory::InMemoryCollection;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::activity::Activity;
use crate::domain::error::DomainError;
use crate::domain::expense::Expense;
use crate::domain::note::Note;
use crate::domain::trip::Trip;
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::future::{Ready, ready};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub type TripStore = InMemoryCollection<Trip>;
pub type ActivityService = ChildService<Activity, InMemoryCollection<Activity>, TripStore>;
pub type NoteService = ChildService<Note, InMemoryCollection<Note>, TripStore>;
pub type ExpenseService = ChildService<Expense, InMemoryCollection<Expense>, TripStore>;

pub struct AppState {
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
    pub trips: TripService<TripStore, InMemoryCollection<Activity>>,
    pub activities: ActivityService,
    pub notes: NoteService,
    pub expenses: ExpenseService,
}

impl AppState {
    /// Wires every service to fresh in-memory collections. The trip and
    /// activity collections are shared between the services that use them.
    pub fn in_memory(auth_service: Arc<AuthService<InMemoryUserRepository>>) -> Self {
        let trips = Arc::new(TripStore::new());
        let activities = Arc::new(InMemoryCollection::new());

        Self {
            auth_service,
            trips: TripService::new(trips.clone(), activities.clone()),
            activities: ChildService::new(activities, trips.clone()),
            notes: ChildService::new(Arc::new(InMemoryCollection::new()), trips.clone()),
            expenses: ChildService::new(Arc::new(InMemoryCollection::new()), trips),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unknown(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Authentication(_) => "AuthenticationError",
            ApiError::Validation(_) => "ValidationError",
            ApiError::NotFound(_) => "NotFoundError",
            ApiError::Unknown(_) => "UnknownError",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let message = match self {
            ApiError::Unknown(detail) => {
                error!(error = %detail, status = %status, "Unexpected failure");
                "Something went wrong".to_string()
            }
            other => {
                warn!(error = %other, kind = other.kind(), status = %status, "Request failed");
                other.to_string()
            }
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind(),
            message,
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Authentication(msg)) => ApiError::Authentication(msg.clone()),
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::Internal(msg)) => ApiError::Unknown(msg.clone()),
            None => ApiError::Unknown(format!("{:#}", err)),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(user.ok_or_else(|| ApiError::Authentication("User not authenticated".to_string())))
    }
}

/// Malformed bodies (missing fields, wrong types, unknown enum values) are
/// validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

/// Ids that do not parse cannot name an existing record.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| ApiError::NotFound("Resource not found".to_string()).into())
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::Authentication("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (DomainError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (domain, status) in cases {
            let api = ApiError::from(anyhow::Error::from(domain));
            assert_eq!(api.status_code(), status);
        }
    }

    #[test]
    fn test_foreign_errors_are_unknown() {
        let api = ApiError::from(anyhow::anyhow!("disk on fire"));
        assert!(matches!(api, ApiError::Unknown(_)));
    }

    #[actix_web::test]
    async fn test_error_body_carries_message() {
        let response = ApiError::NotFound("Trip not found".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Trip not found");
        assert_eq!(json["error"], "NotFoundError");
    }

    #[actix_web::test]
    async fn test_unknown_error_hides_details() {
        let response = ApiError::Unknown("connection reset".to_string()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Something went wrong");
    }
}
