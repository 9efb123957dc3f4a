use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list).post(handlers::create))
        .route("/archived", get(handlers::list_archived))
        .route(
            "/:id",
            get(handlers::get_one)
                .put(handlers::update)
                .delete(handlers::archive),
        )
}
