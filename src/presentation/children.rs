use crate::application::child_service::ChildService;
use crate::data::memory::InMemoryCollection;
use crate::domain::activity::Activity;
use crate::domain::document::{ChildDocument, Document};
use crate::domain::expense::Expense;
use crate::domain::note::Note;
use crate::presentation::handlers::{
    ActivityService, ApiError, AppState, ExpenseService, NoteService, TripStore,
};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Record type served under `/trips/{trip_id}/<collection>`.
pub trait TripResource: ChildDocument + Serialize {
    fn service(state: &AppState) -> &ChildService<Self, InMemoryCollection<Self>, TripStore>;
}

impl TripResource for Activity {
    fn service(state: &AppState) -> &ActivityService {
        &state.activities
    }
}

impl TripResource for Note {
    fn service(state: &AppState) -> &NoteService {
        &state.notes
    }
}

impl TripResource for Expense {
    fn service(state: &AppState) -> &ExpenseService {
        &state.expenses
    }
}

#[instrument(skip(state, user), fields(record = C::NAME, user_id = %user.user_id, trip_id = %*path))]
pub async fn list_records<C: TripResource>(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let records = C::service(&state).list(user.user_id, path.into_inner()).await?;
    info!(count = records.len(), "Records listed");
    Ok(HttpResponse::Ok().json(records))
}

#[instrument(skip(state, user), fields(record = C::NAME, user_id = %user.user_id))]
pub async fn get_record<C: TripResource>(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (trip_id, id) = path.into_inner();
    let record = C::service(&state).get(user.user_id, trip_id, id).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[instrument(skip(state, user, body), fields(record = C::NAME, user_id = %user.user_id, trip_id = %*path))]
pub async fn create_record<C>(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<C::Body>,
) -> Result<HttpResponse, ApiError>
where
    C: TripResource,
    C::Body: DeserializeOwned + 'static,
{
    let record = C::service(&state)
        .create(user.user_id, path.into_inner(), body.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create record");
            e
        })?;
    info!(id = %record.id(), "Record created successfully");
    Ok(HttpResponse::Created().json(record))
}

#[instrument(skip(state, user, body), fields(record = C::NAME, user_id = %user.user_id))]
pub async fn update_record<C>(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<C::Patch>,
) -> Result<HttpResponse, ApiError>
where
    C: TripResource,
    C::Patch: DeserializeOwned + 'static,
{
    let (trip_id, id) = path.into_inner();
    let record = C::service(&state)
        .update(user.user_id, trip_id, id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

#[instrument(skip(state, user), fields(record = C::NAME, user_id = %user.user_id))]
pub async fn delete_record<C: TripResource>(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (trip_id, id) = path.into_inner();
    C::service(&state).delete(user.user_id, trip_id, id).await?;
    info!(id = %id, "Record deleted successfully");
    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}
