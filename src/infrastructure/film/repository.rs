//! In-memory film repository implementation

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::film::{
    Film, FilmDetails, FilmFilter, FilmId, FilmOwner, FilmRepository, NewFilm,
};
use crate::domain::user::UserRepository;
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct FilmTable {
    films: BTreeMap<FilmId, Film>,
    /// Index for title -> film ID lookup, doubles as the unique constraint
    title_index: HashMap<String, FilmId>,
    last_id: i64,
}

/// In-memory implementation of FilmRepository
///
/// Owner details are resolved through the user store, mirroring the join a
/// relational store performs.
#[derive(Clone)]
pub struct InMemoryFilmRepository {
    table: Arc<RwLock<FilmTable>>,
    users: Arc<dyn UserRepository>,
}

impl fmt::Debug for InMemoryFilmRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryFilmRepository").finish_non_exhaustive()
    }
}

impl InMemoryFilmRepository {
    /// Create a new empty repository resolving owners through `users`
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            table: Arc::new(RwLock::new(FilmTable::default())),
            users,
        }
    }

    /// Number of stored films
    pub async fn len(&self) -> usize {
        self.table.read().await.films.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl FilmRepository for InMemoryFilmRepository {
    async fn find(&self, filter: &FilmFilter) -> Result<Vec<Film>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .films
            .values()
            .filter(|film| filter.matches(film))
            .cloned()
            .collect())
    }

    async fn get(&self, id: FilmId) -> Result<Option<Film>, DomainError> {
        let table = self.table.read().await;
        Ok(table.films.get(&id).cloned())
    }

    async fn get_details(&self, id: FilmId) -> Result<Option<FilmDetails>, DomainError> {
        let Some(film) = self.get(id).await? else {
            return Ok(None);
        };

        let owner = self.users.get(film.owner_id()).await?.ok_or_else(|| {
            DomainError::storage(format!(
                "Film {} references missing user {}",
                film.id(),
                film.owner_id()
            ))
        })?;

        Ok(Some(FilmDetails {
            owner: FilmOwner::from(&owner),
            film,
        }))
    }

    async fn create(&self, film: NewFilm) -> Result<Film, DomainError> {
        let mut table = self.table.write().await;

        if table.title_index.contains_key(&film.title) {
            return Err(DomainError::duplicate_key("title"));
        }

        table.last_id += 1;
        let id = FilmId::new(table.last_id);
        let film = Film::from_new(id, film);

        table.title_index.insert(film.title().to_string(), id);
        table.films.insert(id, film.clone());

        Ok(film)
    }

    async fn update(&self, film: &Film) -> Result<Film, DomainError> {
        let mut table = self.table.write().await;
        let id = film.id();

        let old_title = match table.films.get(&id) {
            Some(existing) => existing.title().to_string(),
            None => return Err(DomainError::film_not_found(id.value())),
        };

        if old_title != film.title() {
            if table.title_index.contains_key(film.title()) {
                return Err(DomainError::duplicate_key("title"));
            }

            table.title_index.remove(&old_title);
            table.title_index.insert(film.title().to_string(), id);
        }

        table.films.insert(id, film.clone());

        Ok(film.clone())
    }

    async fn delete(&self, id: FilmId) -> Result<(), DomainError> {
        let mut table = self.table.write().await;

        match table.films.remove(&id) {
            Some(film) => {
                table.title_index.remove(film.title());
                Ok(())
            }
            None => Err(DomainError::film_not_found(id.value())),
        }
    }
}
