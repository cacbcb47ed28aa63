pub mod auth;
pub mod children;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod trips;
