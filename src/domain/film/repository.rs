//! Film store trait

use async_trait::async_trait;

use super::entity::{Film, FilmDetails, FilmFilter, FilmId, NewFilm};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository trait for film storage
///
/// Implementations must enforce title uniqueness at the storage layer and
/// report a violation as [`DomainError::DuplicateKey`] with field `title`,
/// distinct from any other storage failure.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FilmRepository: Send + Sync {
    /// List films matching every present filter, ordered by ID
    async fn find(&self, filter: &FilmFilter) -> Result<Vec<Film>, DomainError>;

    /// Get a film by its ID
    async fn get(&self, id: FilmId) -> Result<Option<Film>, DomainError>;

    /// Get a film with its owner's public fields
    async fn get_details(&self, id: FilmId) -> Result<Option<FilmDetails>, DomainError>;

    /// Persist a new film, returning it with its assigned ID
    async fn create(&self, film: NewFilm) -> Result<Film, DomainError>;

    /// Overwrite the stored mutable fields of an existing film
    async fn update(&self, film: &Film) -> Result<Film, DomainError>;

    /// Delete a film by ID
    async fn delete(&self, id: FilmId) -> Result<(), DomainError>;
}
