use crate::domain::trip::{TripBody, TripPatch};
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use tracing::{error, info, instrument};
use uuid::Uuid;

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_trips(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let trips = state.trips.list(user.user_id).await?;
    info!(count = trips.len(), "Trips listed");
    Ok(HttpResponse::Ok().json(trips))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id, trip_id = %*path))]
pub async fn get_trip(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let trip = state.trips.get(user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(trip))
}

#[instrument(skip(state, user, body), fields(user_id = %user.user_id, trip_id))]
pub async fn create_trip(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<TripBody>,
) -> Result<HttpResponse, ApiError> {
    let trip = state
        .trips
        .create(user.user_id, body.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create trip");
            e
        })?;
    tracing::Span::current().record("trip_id", tracing::field::display(trip.id));
    info!(destination = %trip.destination, "Trip created successfully");
    Ok(HttpResponse::Created().json(trip))
}

#[instrument(skip(state, user, body), fields(user_id = %user.user_id, trip_id = %*path))]
pub async fn update_trip(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<TripPatch>,
) -> Result<HttpResponse, ApiError> {
    let trip = state
        .trips
        .update(user.user_id, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(trip))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id, trip_id = %*path))]
pub async fn delete_trip(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    state
        .trips
        .delete_trip(user.user_id, path.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to delete trip");
            e
        })?;
    info!("Trip deleted successfully");
    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}
