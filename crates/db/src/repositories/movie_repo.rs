//! PostgreSQL implementation of [`MovieRepository`] over the `movies` table.

use async_trait::async_trait;
use movies_core::movie::Movie;
use movies_core::repository::{MovieFilter, MovieRepository, PendingChange, RepoError, UnitOfWork};
use movies_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::movie::MovieRow;

/// Column list for `movies` queries.
const COLUMNS: &str = "\
    id, title, summary, poster_uri, release_date, off_theaters_date, \
    room, duration_secs";

fn backend(err: sqlx::Error) -> RepoError {
    RepoError::Backend(Box::new(err))
}

fn into_movies(rows: Vec<MovieRow>) -> Result<Vec<Movie>, RepoError> {
    rows.into_iter().map(Movie::try_from).collect()
}

/// Provides data access for movies.
#[derive(Debug, Clone)]
pub struct MovieRepo {
    pool: PgPool,
}

impl MovieRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn apply(conn: &mut PgConnection, change: PendingChange) -> Result<u64, sqlx::Error> {
        let result = match change {
            PendingChange::Insert(movie) => {
                sqlx::query(
                    "INSERT INTO movies \
                         (title, summary, poster_uri, release_date, off_theaters_date, room, duration_secs) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7)",
                )
                .bind(&movie.title)
                .bind(&movie.summary)
                .bind(&movie.poster_uri)
                .bind(movie.release_date)
                .bind(movie.off_theaters_date)
                .bind(movie.room.as_str())
                .bind(movie.duration.num_seconds())
                .execute(&mut *conn)
                .await?
            }
            PendingChange::Replace(movie) => {
                sqlx::query(
                    "UPDATE movies SET \
                         title = $2, summary = $3, poster_uri = $4, release_date = $5, \
                         off_theaters_date = $6, room = $7, duration_secs = $8 \
                     WHERE id = $1",
                )
                .bind(movie.id)
                .bind(&movie.title)
                .bind(&movie.summary)
                .bind(&movie.poster_uri)
                .bind(movie.release_date)
                .bind(movie.off_theaters_date)
                .bind(movie.room.as_str())
                .bind(movie.duration.num_seconds())
                .execute(&mut *conn)
                .await?
            }
            PendingChange::Delete(id) => {
                sqlx::query("DELETE FROM movies WHERE id = $1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?
            }
        };
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl MovieRepository for MovieRepo {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        let row = sqlx::query_as::<_, MovieRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.map(Movie::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Movie>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM movies ORDER BY id");
        let rows = sqlx::query_as::<_, MovieRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        into_movies(rows)
    }

    async fn search(&self, filter: MovieFilter) -> Result<Vec<Movie>, RepoError> {
        let rows = match filter {
            MovieFilter::OffTheatersAfter(instant) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM movies \
                     WHERE off_theaters_date > $1 \
                     ORDER BY release_date, id"
                );
                sqlx::query_as::<_, MovieRow>(&query)
                    .bind(instant)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(backend)?;
        into_movies(rows)
    }

    async fn any(&self, id: DbId) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(backend)
    }

    /// Applies the staged changes in order inside one transaction.
    ///
    /// Returns the total number of rows affected. Any failure rolls the
    /// transaction back when it is dropped.
    async fn save_changes(&self, work: UnitOfWork) -> Result<u64, RepoError> {
        if work.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(backend)?;
        let mut affected = 0;
        for change in work.into_changes() {
            affected += Self::apply(&mut tx, change).await.map_err(backend)?;
        }
        tx.commit().await.map_err(backend)?;

        tracing::debug!(affected, "Movie changes committed");
        Ok(affected)
    }
}
