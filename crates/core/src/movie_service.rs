//! Movie use cases: validate, then stage and commit through the repository.
//!
//! Bad input never surfaces as an `Err`. It is recorded on the request's
//! [`Notifier`] and the repository is left untouched; `Err` is reserved for
//! storage failures.

use crate::clock::Clock;
use crate::dto::{
    MovieDetailedResponseDto, MovieRequestDto, MovieResponseDto, UpdateMovieRequestDto,
};
use crate::movie::Movie;
use crate::notification::{run_validation, Notifier};
use crate::repository::{MovieFilter, MovieRepository, RepoError, UnitOfWork};
use crate::types::DbId;
use crate::validation::validate_movie;

/// Request-scoped movie service.
///
/// Borrows the shared repository and clock, and the notifier that belongs to
/// the current request.
pub struct MovieService<'a> {
    repo: &'a dyn MovieRepository,
    clock: &'a dyn Clock,
    notifier: &'a mut Notifier,
}

impl<'a> MovieService<'a> {
    pub fn new(
        repo: &'a dyn MovieRepository,
        clock: &'a dyn Clock,
        notifier: &'a mut Notifier,
    ) -> Self {
        Self {
            repo,
            clock,
            notifier,
        }
    }

    pub fn has_notifications(&self) -> bool {
        self.notifier.has_notifications()
    }

    pub async fn any(&self, id: DbId) -> Result<bool, RepoError> {
        self.repo.any(id).await
    }

    pub async fn find_by_id(
        &self,
        id: DbId,
    ) -> Result<Option<MovieDetailedResponseDto>, RepoError> {
        let movie = self.repo.find_by_id(id).await?;
        Ok(movie.as_ref().map(MovieDetailedResponseDto::from))
    }

    pub async fn find_all(&self) -> Result<Vec<MovieResponseDto>, RepoError> {
        let movies = self.repo.find_all().await?;
        Ok(movies.iter().map(MovieResponseDto::from).collect())
    }

    /// Movies whose off-theaters date is still in the future.
    pub async fn find_in_theaters(&self) -> Result<Vec<MovieResponseDto>, RepoError> {
        let filter = MovieFilter::OffTheatersAfter(self.clock.now());
        let movies = self.repo.search(filter).await?;
        Ok(movies.iter().map(MovieResponseDto::from).collect())
    }

    pub async fn add(&mut self, dto: MovieRequestDto) -> Result<(), RepoError> {
        let movie = Movie::from(dto);
        if !self.validate(&movie) {
            tracing::debug!(title = %movie.title, "Movie rejected by validation");
            return Ok(());
        }

        let mut work = UnitOfWork::new();
        work.add(movie);
        self.repo.save_changes(work).await?;
        Ok(())
    }

    pub async fn update(&mut self, dto: UpdateMovieRequestDto) -> Result<(), RepoError> {
        let movie = Movie::from(dto);
        if !self.validate(&movie) {
            tracing::debug!(movie_id = movie.id, "Movie update rejected by validation");
            return Ok(());
        }

        let mut work = UnitOfWork::new();
        work.update(movie);
        self.repo.save_changes(work).await?;
        Ok(())
    }

    /// Delete by id. Existence is the caller's concern; see [`Self::any`].
    pub async fn delete_by_id(&mut self, id: DbId) -> Result<(), RepoError> {
        let mut work = UnitOfWork::new();
        work.remove(id);
        self.repo.save_changes(work).await?;
        Ok(())
    }

    fn validate(&mut self, movie: &Movie) -> bool {
        let now = self.clock.now();
        run_validation(self.notifier, movie, |m| validate_movie(m, now))
    }
}
