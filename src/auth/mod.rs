use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod cookies;
pub mod dto;
pub mod extract;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/me", get(handlers::me))
}
