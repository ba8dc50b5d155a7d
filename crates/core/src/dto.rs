//! Request and response shapes, and their mapping to and from [`Movie`].
//!
//! Request DTOs carry coarse model checks (`validator` derive) that run
//! before a request reaches the service; the business rules proper live in
//! [`crate::validation`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::movie::{Movie, Room};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Payload for creating a movie. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MovieRequestDto {
    #[validate(length(min = 2, max = 100, message = "Title must be between 2 and 100 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "Summary must be at most 500 characters"))]
    pub summary: String,
    #[validate(length(max = 150, message = "Poster URI must be at most 150 characters"))]
    pub poster_uri: String,
    pub release_date: Timestamp,
    pub off_theaters_date: Timestamp,
    pub room: Room,
    /// Runtime in whole minutes.
    pub duration_minutes: i64,
}

/// Payload for replacing a movie's mutable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateMovieRequestDto {
    pub id: DbId,
    #[serde(flatten)]
    #[validate(nested)]
    pub movie: MovieRequestDto,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Movie as shown in list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieResponseDto {
    pub id: DbId,
    pub title: String,
    pub poster_uri: String,
    pub release_date: Timestamp,
    pub off_theaters_date: Timestamp,
    pub room: Room,
}

/// Full movie detail. This is also the value stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetailedResponseDto {
    pub id: DbId,
    pub title: String,
    pub poster_uri: String,
    pub release_date: Timestamp,
    pub off_theaters_date: Timestamp,
    pub room: Room,
    pub summary: String,
    pub duration_minutes: i64,
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

impl MovieRequestDto {
    /// Build the entity, assigning `id`.
    ///
    /// A runtime too large to represent maps to zero, which the duration
    /// rule then rejects.
    pub fn into_movie(self, id: DbId) -> Movie {
        Movie {
            id,
            title: self.title,
            summary: self.summary,
            poster_uri: self.poster_uri,
            release_date: self.release_date,
            off_theaters_date: self.off_theaters_date,
            room: self.room,
            duration: chrono::Duration::try_minutes(self.duration_minutes)
                .unwrap_or_else(chrono::Duration::zero),
        }
    }
}

impl From<MovieRequestDto> for Movie {
    fn from(dto: MovieRequestDto) -> Self {
        dto.into_movie(0)
    }
}

impl From<UpdateMovieRequestDto> for Movie {
    fn from(dto: UpdateMovieRequestDto) -> Self {
        dto.movie.into_movie(dto.id)
    }
}

impl From<&Movie> for MovieResponseDto {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_uri: movie.poster_uri.clone(),
            release_date: movie.release_date,
            off_theaters_date: movie.off_theaters_date,
            room: movie.room,
        }
    }
}

impl From<&Movie> for MovieDetailedResponseDto {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_uri: movie.poster_uri.clone(),
            release_date: movie.release_date,
            off_theaters_date: movie.off_theaters_date,
            room: movie.room,
            summary: movie.summary.clone(),
            duration_minutes: movie.duration.num_minutes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn request() -> MovieRequestDto {
        let release = Utc.with_ymd_and_hms(2024, 7, 1, 20, 0, 0).unwrap();
        MovieRequestDto {
            title: "Spirited Away".into(),
            summary: "A girl wanders into a world of spirits.".into(),
            poster_uri: "https://posters.example.com/spirited.png".into(),
            release_date: release,
            off_theaters_date: release + Duration::days(21),
            room: Room::ThreeD,
            duration_minutes: 125,
        }
    }

    #[test]
    fn create_request_maps_to_unsaved_entity() {
        let movie: Movie = request().into();
        assert_eq!(movie.id, 0);
        assert_eq!(movie.title, "Spirited Away");
        assert_eq!(movie.duration, Duration::minutes(125));
        assert_eq!(movie.room, Room::ThreeD);
    }

    #[test]
    fn update_request_keeps_its_id() {
        let movie: Movie = UpdateMovieRequestDto {
            id: 42,
            movie: request(),
        }
        .into();
        assert_eq!(movie.id, 42);
    }

    #[test]
    fn oversized_duration_maps_to_zero() {
        let movie = MovieRequestDto {
            duration_minutes: i64::MAX,
            ..request()
        }
        .into_movie(1);
        assert_eq!(movie.duration, Duration::zero());
    }

    #[test]
    fn detailed_response_carries_summary_and_duration() {
        let movie = request().into_movie(5);
        let detail = MovieDetailedResponseDto::from(&movie);
        assert_eq!(detail.id, 5);
        assert_eq!(detail.summary, movie.summary);
        assert_eq!(detail.duration_minutes, 125);

        let item = MovieResponseDto::from(&movie);
        assert_eq!(item.title, detail.title);
        assert_eq!(item.off_theaters_date, detail.off_theaters_date);
    }

    #[test]
    fn update_request_reads_flat_json() {
        let json = serde_json::json!({
            "id": 3,
            "title": "Alien",
            "summary": "In space no one can hear you scream.",
            "poster_uri": "https://posters.example.com/alien.png",
            "release_date": "2024-07-01T20:00:00Z",
            "off_theaters_date": "2024-08-01T20:00:00Z",
            "room": "Imax",
            "duration_minutes": 117
        });
        let dto: UpdateMovieRequestDto = serde_json::from_value(json).unwrap();
        assert_eq!(dto.id, 3);
        assert_eq!(dto.movie.room, Room::Imax);
    }

    #[test]
    fn model_checks_reject_short_title_and_long_poster_uri() {
        let dto = MovieRequestDto {
            title: "A".into(),
            poster_uri: format!("https://example.com/{}", "p".repeat(150)),
            ..request()
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("poster_uri"));
        assert!(request().validate().is_ok());
    }

    #[test]
    fn nested_model_checks_apply_to_update_requests() {
        let dto = UpdateMovieRequestDto {
            id: 1,
            movie: MovieRequestDto {
                summary: "s".repeat(501),
                ..request()
            },
        };
        assert!(dto.validate().is_err());
    }
}
