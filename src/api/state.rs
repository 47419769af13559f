//! Application state for shared services

use std::sync::Arc;

use crate::domain::film::{
    Film, FilmDetails, FilmFilter, FilmId, FilmRepository, FilmUpdate, NewFilm,
};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::{IssuedToken, TokenIssuer};
use crate::infrastructure::film::FilmService;
use crate::infrastructure::user::{PasswordHasher, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub film_service: Arc<dyn FilmServiceTrait>,
    pub token_issuer: Arc<dyn TokenIssuer>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        film_service: Arc<dyn FilmServiceTrait>,
        token_issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            user_service,
            film_service,
            token_issuer,
        }
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, username: &str, password: &str) -> Result<User, DomainError>;
    async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, DomainError>;
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;
}

/// Trait for film service operations
#[async_trait::async_trait]
pub trait FilmServiceTrait: Send + Sync {
    async fn list(&self, filter: FilmFilter) -> Result<Vec<Film>, DomainError>;
    async fn get_details(&self, id: FilmId) -> Result<FilmDetails, DomainError>;
    async fn create(&self, film: NewFilm) -> Result<Film, DomainError>;
    async fn update(
        &self,
        id: FilmId,
        caller: UserId,
        update: FilmUpdate,
    ) -> Result<Film, DomainError>;
    async fn delete(&self, id: FilmId, caller: UserId) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl<R, H, T> UserServiceTrait for UserService<R, H, T>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
    T: TokenIssuer + 'static,
{
    async fn register(&self, username: &str, password: &str) -> Result<User, DomainError> {
        UserService::register(self, username, password).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, DomainError> {
        UserService::login(self, username, password).await
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }
}

#[async_trait::async_trait]
impl<R: FilmRepository + 'static> FilmServiceTrait for FilmService<R> {
    async fn list(&self, filter: FilmFilter) -> Result<Vec<Film>, DomainError> {
        FilmService::list_films(self, filter).await
    }

    async fn get_details(&self, id: FilmId) -> Result<FilmDetails, DomainError> {
        FilmService::get_film_details(self, id).await
    }

    async fn create(&self, film: NewFilm) -> Result<Film, DomainError> {
        FilmService::create_film(self, film).await
    }

    async fn update(
        &self,
        id: FilmId,
        caller: UserId,
        update: FilmUpdate,
    ) -> Result<Film, DomainError> {
        FilmService::update_film(self, id, caller, update).await
    }

    async fn delete(&self, id: FilmId, caller: UserId) -> Result<(), DomainError> {
        FilmService::delete_film(self, id, caller).await
    }
}
