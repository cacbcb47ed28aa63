use crate::application::auth_service::AuthService;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::activity::Activity;
use crate::domain::document::ChildDocument;
use crate::domain::expense::Expense;
use crate::domain::note::Note;
use crate::presentation::auth::{current_user, login, register};
use crate::presentation::children::{
    TripResource, create_record, delete_record, get_record, list_records, update_record,
};
use crate::presentation::handlers::{health_check, json_config, path_config};
use crate::presentation::middleware::JwtAuthMiddleware;
use crate::presentation::trips::{create_trip, delete_trip, get_trip, list_trips, update_trip};
use actix_web::{Scope, web};
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub const ROUTES: &str = "GET /health, POST /login, POST /register, GET /users/current, \
GET|POST /trips, GET|PATCH|DELETE /trips/{id}, \
GET|POST /trips/{trip_id}/{activities|notes|expenses}, \
GET|PATCH|DELETE /trips/{trip_id}/{activities|notes|expenses}/{id}";

/// Registers the public routes and the token-protected scope.
pub fn configure(cfg: &mut web::ServiceConfig, auth_service: Arc<AuthService<InMemoryUserRepository>>) {
    let protected = web::scope("")
        .route("/users/current", web::get().to(current_user))
        .route("/trips", web::get().to(list_trips))
        .route("/trips", web::post().to(create_trip))
        .route("/trips/{id}", web::get().to(get_trip))
        .route("/trips/{id}", web::patch().to(update_trip))
        .route("/trips/{id}", web::delete().to(delete_trip));
    let protected = trip_resource::<Activity>(protected);
    let protected = trip_resource::<Note>(protected);
    let protected = trip_resource::<Expense>(protected);

    cfg.app_data(json_config())
        .app_data(path_config())
        .route("/health", web::get().to(health_check))
        .route("/login", web::post().to(login))
        .route("/register", web::post().to(register))
        .service(protected.wrap(JwtAuthMiddleware::new(auth_service)));
}

fn trip_resource<C>(scope: Scope) -> Scope
where
    C: TripResource,
    C::Body: DeserializeOwned + 'static,
    C::Patch: DeserializeOwned + 'static,
{
    let collection = format!("/trips/{{trip_id}}/{}", C::COLLECTION);
    let item = format!("{}/{{id}}", collection);

    scope
        .route(&collection, web::get().to(list_records::<C>))
        .route(&collection, web::post().to(create_record::<C>))
        .route(&item, web::get().to(get_record::<C>))
        .route(&item, web::patch().to(update_record::<C>))
        .route(&item, web::delete().to(delete_record::<C>))
}
