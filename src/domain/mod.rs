pub mod activity;
pub mod document;
pub mod error;
pub mod expense;
pub mod note;
pub mod repository;
pub mod trip;
pub mod user;
pub mod validation;
