//! Typed HTTP client for the trip planner API.
//!
//! The session token lives inside the client. Any 401 answer clears it, which
//! is the signal for views to send the user back to the login screen.

use crate::domain::document::{ChildDocument, WithTrip};
use crate::domain::trip::{Trip, TripBody, TripPatch};
use crate::domain::user::{AuthToken, CreateUser, LoginRequest, UserProfile};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

/// Bearer token shared by clones of one client.
#[derive(Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub async fn set_token(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    pub async fn logout(&self) {
        self.token.write().await.take();
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            session: Session::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let request = match self.session.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            warn!("Unauthorized response, clearing session");
            self.session.logout().await;
            return Err(ClientError::Unauthorized(error_message(&body, status)));
        }

        if !status.is_success() {
            debug!(status = status.as_u16(), "Request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let request = self.request(Method::POST, "/login").json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        });
        let AuthToken { token } = self.send(request).await?;
        self.session.set_token(token).await;
        Ok(())
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: &CreateUser) -> Result<UserProfile, ClientError> {
        self.send(self.request(Method::POST, "/register").json(user))
            .await
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }

    pub async fn current_user(&self) -> Result<UserProfile, ClientError> {
        self.send(self.request(Method::GET, "/users/current"))
            .await
    }

    pub async fn list_trips(&self) -> Result<Vec<Trip>, ClientError> {
        self.send(self.request(Method::GET, "/trips")).await
    }

    pub async fn get_trip(&self, id: Uuid) -> Result<Trip, ClientError> {
        self.send(self.request(Method::GET, &format!("/trips/{}", id)))
            .await
    }

    #[instrument(skip(self, body), fields(destination = %body.destination))]
    pub async fn create_trip(&self, body: &TripBody) -> Result<Trip, ClientError> {
        self.send(self.request(Method::POST, "/trips").json(body))
            .await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_trip(&self, id: Uuid, patch: &TripPatch) -> Result<Trip, ClientError> {
        self.send(
            self.request(Method::PATCH, &format!("/trips/{}", id))
                .json(patch),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_trip(&self, id: Uuid) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .send(self.request(Method::DELETE, &format!("/trips/{}", id)))
            .await?;
        Ok(())
    }

    pub async fn list_records<C>(&self, trip_id: Uuid) -> Result<Vec<WithTrip<C>>, ClientError>
    where
        C: ChildDocument + DeserializeOwned,
    {
        self.send(self.request(Method::GET, &collection_path::<C>(trip_id)))
            .await
    }

    pub async fn get_record<C>(&self, trip_id: Uuid, id: Uuid) -> Result<WithTrip<C>, ClientError>
    where
        C: ChildDocument + DeserializeOwned,
    {
        self.send(self.request(Method::GET, &record_path::<C>(trip_id, id)))
            .await
    }

    #[instrument(skip(self, body), fields(record = C::NAME))]
    pub async fn create_record<C>(&self, trip_id: Uuid, body: &C::Body) -> Result<C, ClientError>
    where
        C: ChildDocument + DeserializeOwned,
        C::Body: Serialize,
    {
        self.send(
            self.request(Method::POST, &collection_path::<C>(trip_id))
                .json(body),
        )
        .await
    }

    #[instrument(skip(self, patch), fields(record = C::NAME))]
    pub async fn update_record<C>(
        &self,
        trip_id: Uuid,
        id: Uuid,
        patch: &C::Patch,
    ) -> Result<C, ClientError>
    where
        C: ChildDocument + DeserializeOwned,
        C::Patch: Serialize,
    {
        self.send(
            self.request(Method::PATCH, &record_path::<C>(trip_id, id))
                .json(patch),
        )
        .await
    }

    #[instrument(skip(self), fields(record = C::NAME))]
    pub async fn delete_record<C: ChildDocument>(
        &self,
        trip_id: Uuid,
        id: Uuid,
    ) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .send(self.request(Method::DELETE, &record_path::<C>(trip_id, id)))
            .await?;
        Ok(())
    }
}

/// Path of a trip's child collection, also used as a view route.
pub fn collection_path<C: ChildDocument>(trip_id: Uuid) -> String {
    format!("/trips/{}/{}", trip_id, C::COLLECTION)
}

pub fn record_path<C: ChildDocument>(trip_id: Uuid, id: Uuid) -> String {
    format!("{}/{}", collection_path::<C>(trip_id), id)
}

fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}
