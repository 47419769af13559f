//! Film service enforcing ownership and title policy

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::film::{
    Film, FilmDetails, FilmFilter, FilmId, FilmRepository, FilmUpdate, NewFilm,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Film service for catalog management
#[derive(Debug)]
pub struct FilmService<R: FilmRepository> {
    repository: Arc<R>,
}

impl<R: FilmRepository> FilmService<R> {
    /// Create a new film service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// List films matching every present filter
    pub async fn list_films(&self, filter: FilmFilter) -> Result<Vec<Film>, DomainError> {
        self.repository.find(&filter).await
    }

    /// Get a film together with its owner's public identity
    pub async fn get_film_details(&self, id: FilmId) -> Result<FilmDetails, DomainError> {
        self.repository
            .get_details(id)
            .await?
            .ok_or_else(|| DomainError::film_not_found(id.value()))
    }

    /// Create a film owned by `film.owner_id`
    pub async fn create_film(&self, film: NewFilm) -> Result<Film, DomainError> {
        if film.title.is_empty() {
            return Err(DomainError::TitleRequired);
        }

        let title = film.title.clone();
        let created = self
            .repository
            .create(film)
            .await
            .map_err(|e| translate_duplicate_title(e, &title))?;

        info!(film_id = %created.id(), owner_id = %created.owner_id(), "Film created");

        Ok(created)
    }

    /// Merge `update` into a film owned by `caller`
    ///
    /// Existence is checked before ownership.
    pub async fn update_film(
        &self,
        id: FilmId,
        caller: UserId,
        update: FilmUpdate,
    ) -> Result<Film, DomainError> {
        let mut film = self.owned_film(id, caller, "only creator can update this film").await?;

        let title_changed = film.apply(update);
        debug!(film_id = %id, title_changed, "Applying film update");

        let updated = self
            .repository
            .update(&film)
            .await
            .map_err(|e| translate_duplicate_title(e, film.title()))?;

        info!(film_id = %id, "Film updated");

        Ok(updated)
    }

    /// Delete a film owned by `caller`
    pub async fn delete_film(&self, id: FilmId, caller: UserId) -> Result<(), DomainError> {
        self.owned_film(id, caller, "only creator can delete this film").await?;

        self.repository.delete(id).await?;

        info!(film_id = %id, "Film deleted");

        Ok(())
    }

    async fn owned_film(
        &self,
        id: FilmId,
        caller: UserId,
        denial: &str,
    ) -> Result<Film, DomainError> {
        let film = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::film_not_found(id.value()))?;

        if !film.is_owned_by(caller) {
            debug!(film_id = %id, caller = %caller, "Caller does not own film");
            return Err(DomainError::forbidden(denial));
        }

        Ok(film)
    }
}

fn translate_duplicate_title(error: DomainError, title: &str) -> DomainError {
    match error {
        DomainError::DuplicateKey { field } if field == "title" => {
            DomainError::duplicate_title(title)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::film::MockFilmRepository;
    use crate::domain::user::{NewUser, UserRepository};
    use crate::infrastructure::film::repository::InMemoryFilmRepository;
    use crate::infrastructure::user::InMemoryUserRepository;
    use chrono::NaiveDate;

    struct Catalog {
        service: FilmService<InMemoryFilmRepository>,
        repository: Arc<InMemoryFilmRepository>,
        alice: UserId,
        bob: UserId,
    }

    async fn create_catalog() -> Catalog {
        let users = Arc::new(InMemoryUserRepository::new());
        let alice = users.create(NewUser::new("alice", "hash")).await.unwrap().id();
        let bob = users.create(NewUser::new("bob", "hash")).await.unwrap().id();

        let repository = Arc::new(InMemoryFilmRepository::new(users));
        Catalog {
            service: FilmService::new(repository.clone()),
            repository,
            alice,
            bob,
        }
    }

    fn matrix(owner: UserId) -> NewFilm {
        NewFilm {
            owner_id: owner,
            title: "Matrix".to_string(),
            director: "Wachowski".to_string(),
            cast: "Keanu Reeves".to_string(),
            genre: "Sci-Fi".to_string(),
            synopsis: "A hacker learns the truth.".to_string(),
            release_date: NaiveDate::from_ymd_opt(1999, 3, 31),
        }
    }

    fn sample_film(id: i64, owner: i64) -> Film {
        Film::from_new(FilmId::new(id), matrix(UserId::new(owner)))
    }

    #[tokio::test]
    async fn test_ownership_scenario() {
        let catalog = create_catalog().await;

        let film = catalog.service.create_film(matrix(catalog.alice)).await.unwrap();
        assert_eq!(film.owner_id(), catalog.alice);

        let by_bob = catalog
            .service
            .update_film(
                film.id(),
                catalog.bob,
                FilmUpdate {
                    title: Some("X".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(by_bob, Err(DomainError::Forbidden { .. })));

        let by_alice = catalog
            .service
            .update_film(
                film.id(),
                catalog.alice,
                FilmUpdate {
                    genre: Some("Action".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_alice.title(), "Matrix");
        assert_eq!(by_alice.genre(), "Action");
        assert_eq!(by_alice.director(), "Wachowski");
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        // No expectations: any store call would panic
        let service = FilmService::new(Arc::new(MockFilmRepository::new()));

        let result = service
            .create_film(NewFilm {
                owner_id: UserId::new(1),
                ..Default::default()
            })
            .await;

        assert_eq!(result.unwrap_err(), DomainError::TitleRequired);
    }

    #[tokio::test]
    async fn test_create_duplicate_title() {
        let catalog = create_catalog().await;

        catalog.service.create_film(matrix(catalog.alice)).await.unwrap();
        let result = catalog.service.create_film(matrix(catalog.bob)).await;

        assert_eq!(result.unwrap_err(), DomainError::duplicate_title("Matrix"));
        assert_eq!(catalog.repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_storage_error_propagates() {
        let mut repository = MockFilmRepository::new();
        repository
            .expect_create()
            .returning(|_| Err(DomainError::storage("connection reset")));

        let result = FilmService::new(Arc::new(repository))
            .create_film(matrix(UserId::new(1)))
            .await;

        assert_eq!(result.unwrap_err(), DomainError::storage("connection reset"));
    }

    #[tokio::test]
    async fn test_update_only_title_leaves_other_fields() {
        let catalog = create_catalog().await;
        let film = catalog.service.create_film(matrix(catalog.alice)).await.unwrap();

        let updated = catalog
            .service
            .update_film(
                film.id(),
                catalog.alice,
                FilmUpdate {
                    title: Some("X".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title(), "X");
        assert_eq!(updated.director(), film.director());
        assert_eq!(updated.cast(), film.cast());
        assert_eq!(updated.genre(), film.genre());
        assert_eq!(updated.synopsis(), film.synopsis());
        assert_eq!(updated.release_date(), film.release_date());
        assert_eq!(updated.owner_id(), catalog.alice);

        let stored = catalog.repository.get(film.id()).await.unwrap().unwrap();
        assert_eq!(stored.title(), "X");
    }

    #[tokio::test]
    async fn test_update_to_existing_title_is_duplicate() {
        let catalog = create_catalog().await;
        catalog.service.create_film(matrix(catalog.alice)).await.unwrap();

        let mut alien = matrix(catalog.alice);
        alien.title = "Alien".to_string();
        let alien = catalog.service.create_film(alien).await.unwrap();

        let result = catalog
            .service
            .update_film(
                alien.id(),
                catalog.alice,
                FilmUpdate {
                    title: Some("Matrix".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(result.unwrap_err(), DomainError::duplicate_title("Matrix"));
    }

    #[tokio::test]
    async fn test_missing_film_is_not_found_for_any_caller() {
        let catalog = create_catalog().await;
        let missing = FilmId::new(42);

        for caller in [catalog.alice, catalog.bob] {
            let update = catalog
                .service
                .update_film(missing, caller, FilmUpdate::default())
                .await;
            assert_eq!(update.unwrap_err(), DomainError::film_not_found(42));

            let delete = catalog.service.delete_film(missing, caller).await;
            assert_eq!(delete.unwrap_err(), DomainError::film_not_found(42));
        }
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_forbidden() {
        let catalog = create_catalog().await;
        let film = catalog.service.create_film(matrix(catalog.alice)).await.unwrap();

        let result = catalog.service.delete_film(film.id(), catalog.bob).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
        assert_eq!(catalog.repository.len().await, 1);

        catalog.service.delete_film(film.id(), catalog.alice).await.unwrap();
        assert!(catalog.repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_forbidden_update_never_writes() {
        let mut repository = MockFilmRepository::new();
        repository
            .expect_get()
            .returning(|id| Ok(Some(sample_film(id.value(), 1))));
        repository.expect_update().never();
        repository.expect_delete().never();

        let service = FilmService::new(Arc::new(repository));
        let caller = UserId::new(2);

        let update = service
            .update_film(FilmId::new(7), caller, FilmUpdate::default())
            .await;
        let delete = service.delete_film(FilmId::new(7), caller).await;

        assert_eq!(
            update.unwrap_err().to_string(),
            "forbidden: only creator can update this film"
        );
        assert_eq!(
            delete.unwrap_err().to_string(),
            "forbidden: only creator can delete this film"
        );
    }

    #[tokio::test]
    async fn test_update_storage_error_propagates() {
        let mut repository = MockFilmRepository::new();
        repository
            .expect_get()
            .returning(|id| Ok(Some(sample_film(id.value(), 1))));
        repository
            .expect_update()
            .returning(|_| Err(DomainError::storage("deadlock detected")));

        let result = FilmService::new(Arc::new(repository))
            .update_film(FilmId::new(7), UserId::new(1), FilmUpdate::default())
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_get_details() {
        let catalog = create_catalog().await;
        let film = catalog.service.create_film(matrix(catalog.alice)).await.unwrap();

        let details = catalog.service.get_film_details(film.id()).await.unwrap();
        assert_eq!(details.film.title(), "Matrix");
        assert_eq!(details.owner.username, "alice");

        let missing = catalog.service.get_film_details(FilmId::new(99)).await;
        assert_eq!(missing.unwrap_err(), DomainError::film_not_found(99));
    }

    #[tokio::test]
    async fn test_list_films_filters() {
        let catalog = create_catalog().await;
        catalog.service.create_film(matrix(catalog.alice)).await.unwrap();

        let mut alien = matrix(catalog.bob);
        alien.title = "Alien".to_string();
        alien.genre = "Horror".to_string();
        catalog.service.create_film(alien).await.unwrap();

        let all = catalog.service.list_films(FilmFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let horror = catalog
            .service
            .list_films(FilmFilter::new(None, Some("Horror".into()), None))
            .await
            .unwrap();
        assert_eq!(horror.len(), 1);
        assert_eq!(horror[0].title(), "Alien");
    }

    #[tokio::test]
    async fn test_list_storage_error_propagates() {
        let mut repository = MockFilmRepository::new();
        repository
            .expect_find()
            .returning(|_| Err(DomainError::storage("timeout")));

        let result = FilmService::new(Arc::new(repository))
            .list_films(FilmFilter::default())
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
