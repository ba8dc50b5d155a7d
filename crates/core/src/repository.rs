//! Repository port for persisted movies.
//!
//! Reads go straight to the store. Writes are staged on a [`UnitOfWork`]
//! and applied together by [`MovieRepository::save_changes`]; nothing is
//! persisted before that call.

use async_trait::async_trait;

use crate::movie::Movie;
use crate::types::{DbId, Timestamp};

/// Failure reported by a repository implementation.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A stored row could not be turned back into a [`Movie`].
    #[error("Corrupt movie record {id}: {reason}")]
    Corrupt { id: DbId, reason: String },

    /// The storage backend failed (connectivity, constraint violation, ...).
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

// ---------------------------------------------------------------------------
// Search filters
// ---------------------------------------------------------------------------

/// Predicates supported by [`MovieRepository::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieFilter {
    /// Movies whose off-theaters date is strictly after the given instant.
    OffTheatersAfter(Timestamp),
}

// ---------------------------------------------------------------------------
// Unit of work
// ---------------------------------------------------------------------------

/// A staged mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingChange {
    Insert(Movie),
    /// Full replace of every mutable field; the id selects the row.
    Replace(Movie),
    /// Only the identifier is carried; no other field is available at
    /// deletion time.
    Delete(DbId),
}

/// Batch of staged mutations committed as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitOfWork {
    changes: Vec<PendingChange>,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an insert. The store assigns the id.
    pub fn add(&mut self, movie: Movie) {
        self.changes.push(PendingChange::Insert(movie));
    }

    /// Stage a full replace of the row identified by `movie.id`.
    pub fn update(&mut self, movie: Movie) {
        self.changes.push(PendingChange::Replace(movie));
    }

    /// Stage a delete by identifier.
    pub fn remove(&mut self, id: DbId) {
        self.changes.push(PendingChange::Delete(id));
    }

    pub fn changes(&self) -> &[PendingChange] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn into_changes(self) -> Vec<PendingChange> {
        self.changes
    }
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, RepoError>;

    async fn find_all(&self) -> Result<Vec<Movie>, RepoError>;

    async fn search(&self, filter: MovieFilter) -> Result<Vec<Movie>, RepoError>;

    async fn any(&self, id: DbId) -> Result<bool, RepoError>;

    /// Apply every staged change atomically and return the number of rows
    /// affected. A failure leaves the store untouched.
    async fn save_changes(&self, work: UnitOfWork) -> Result<u64, RepoError>;
}
