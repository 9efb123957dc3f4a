use axum::routing::{delete, get, patch};
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list).post(handlers::create))
        .route("/archived", get(handlers::list_archived))
        .route("/bookmarked", get(handlers::list_bookmarked))
        .route(
            "/:id",
            get(handlers::get_one)
                .put(handlers::update)
                .delete(handlers::archive),
        )
        .route("/:id/unarchive", patch(handlers::unarchive))
        .route("/:id/pin", patch(handlers::toggle_pin))
        .route("/:id/bookmark", patch(handlers::toggle_bookmark))
        .route("/:id/permanent", delete(handlers::purge))
}
