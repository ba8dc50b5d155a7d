//! Row type for the `movies` table.

use movies_core::movie::{Movie, Room};
use movies_core::repository::RepoError;
use movies_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow)]
pub struct MovieRow {
    pub id: DbId,
    pub title: String,
    pub summary: String,
    pub poster_uri: String,
    pub release_date: Timestamp,
    pub off_theaters_date: Timestamp,
    pub room: String,
    pub duration_secs: i64,
}

impl TryFrom<MovieRow> for Movie {
    type Error = RepoError;

    fn try_from(row: MovieRow) -> Result<Self, Self::Error> {
        let room: Room = row.room.parse().map_err(|e| RepoError::Corrupt {
            id: row.id,
            reason: format!("{e}"),
        })?;
        let duration =
            chrono::Duration::try_seconds(row.duration_secs).ok_or_else(|| RepoError::Corrupt {
                id: row.id,
                reason: format!("duration of {} seconds is out of range", row.duration_secs),
            })?;

        Ok(Movie {
            id: row.id,
            title: row.title,
            summary: row.summary,
            poster_uri: row.poster_uri,
            release_date: row.release_date,
            off_theaters_date: row.off_theaters_date,
            room,
            duration,
        })
    }
}
