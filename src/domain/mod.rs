//! Domain layer - Core business logic and entities

pub mod error;
pub mod film;
pub mod user;

pub use error::{DomainError, ErrorKind};
pub use film::{
    Film, FilmDetails, FilmFilter, FilmId, FilmOwner, FilmRepository, FilmUpdate, NewFilm,
};
pub use user::{NewUser, User, UserId, UserRepository};
