//! Handlers for the movie catalogue.
//!
//! Single-movie reads are cache-aside: the cache is consulted first and
//! filled from the repository on a miss. Successful updates overwrite the
//! cached entry; deletes evict it.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use movies_cache::movie_key;
use movies_core::dto::{MovieDetailedResponseDto, MovieRequestDto, UpdateMovieRequestDto};
use movies_core::error::CoreError;
use movies_core::movie::Movie;
use movies_core::movie_service::MovieService;
use movies_core::notification::Notifier;
use movies_core::types::DbId;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn service<'a>(state: &'a AppState, notifier: &'a mut Notifier) -> MovieService<'a> {
    MovieService::new(state.movies.as_ref(), state.clock.as_ref(), notifier)
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Movie", id })
}

/// Unwrap a JSON body, turning malformed or incomplete payloads into 400s.
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn encode(movie: &MovieDetailedResponseDto) -> AppResult<String> {
    serde_json::to_string(movie).map_err(|e| AppError::InternalError(e.to_string()))
}

/// GET /api/v1/movies/{id}
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let key = movie_key(id);

    if let Some(cached) = state.cache.get(&key).await? {
        match serde_json::from_str::<MovieDetailedResponseDto>(&cached) {
            Ok(movie) => {
                tracing::debug!(movie_id = id, "Movie served from cache");
                return Ok(Json(DataResponse { data: movie }));
            }
            Err(e) => tracing::warn!(movie_id = id, error = %e, "Ignoring unreadable cached movie"),
        }
    }

    let mut notifier = Notifier::new();
    let movie = service(&state, &mut notifier)
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    state.cache.set(&key, &encode(&movie)?).await?;
    tracing::debug!(movie_id = id, "Movie cached");

    Ok(Json(DataResponse { data: movie }))
}

/// GET /api/v1/movies
///
/// Movies still showing (off-theaters date in the future).
pub async fn list_in_theaters(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut notifier = Notifier::new();
    let movies = service(&state, &mut notifier).find_in_theaters().await?;

    Ok(Json(DataResponse { data: movies }))
}

/// GET /api/v1/movies/All
pub async fn list_all(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut notifier = Notifier::new();
    let movies = service(&state, &mut notifier).find_all().await?;

    Ok(Json(DataResponse { data: movies }))
}

/// POST /api/v1/movies
pub async fn create_movie(
    State(state): State<AppState>,
    payload: Result<Json<MovieRequestDto>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let input = parse_body(payload)?;
    input.validate()?;
    let title = input.title.clone();

    let mut notifier = Notifier::new();
    let mut movies = service(&state, &mut notifier);
    movies.add(input).await?;
    if movies.has_notifications() {
        return Err(AppError::Notifications(notifier.into_messages()));
    }

    tracing::info!(title = %title, "Movie created");

    Ok(StatusCode::CREATED)
}

/// PUT /api/v1/movies
///
/// Replace a movie's fields and refresh its cache entry.
pub async fn update_movie(
    State(state): State<AppState>,
    payload: Result<Json<UpdateMovieRequestDto>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let input = parse_body(payload)?;
    input.validate()?;
    let id = input.id;
    let detail = MovieDetailedResponseDto::from(&Movie::from(input.clone()));

    let mut notifier = Notifier::new();
    let mut movies = service(&state, &mut notifier);
    if !movies.any(id).await? {
        return Err(not_found(id));
    }
    movies.update(input).await?;
    if movies.has_notifications() {
        return Err(AppError::Notifications(notifier.into_messages()));
    }

    state.cache.set(&movie_key(id), &encode(&detail)?).await?;
    tracing::info!(movie_id = id, "Movie updated");

    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/movies/{id}
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut notifier = Notifier::new();
    let mut movies = service(&state, &mut notifier);
    if !movies.any(id).await? {
        return Err(not_found(id));
    }
    movies.delete_by_id(id).await?;

    state.cache.remove(&movie_key(id)).await?;
    tracing::info!(movie_id = id, "Movie deleted");

    Ok(StatusCode::NO_CONTENT)
}
