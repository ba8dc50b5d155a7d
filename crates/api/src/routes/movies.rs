//! Route definitions for the `/movies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Routes mounted at `/movies`.
///
/// ```text
/// GET    /        -> list_in_theaters
/// POST   /        -> create_movie
/// PUT    /        -> update_movie
/// GET    /All     -> list_all
/// GET    /{id}    -> get_movie
/// DELETE /{id}    -> delete_movie
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(movies::list_in_theaters)
                .post(movies::create_movie)
                .put(movies::update_movie),
        )
        .route("/All", get(movies::list_all))
        .route("/{id}", get(movies::get_movie).delete(movies::delete_movie))
}
