//! Film domain
//!
//! Film records owned by registered users, the filter and partial-update
//! value types, and the film store trait.

mod entity;
mod repository;

pub use entity::{Film, FilmDetails, FilmFilter, FilmId, FilmOwner, FilmUpdate, NewFilm};
pub use repository::FilmRepository;

#[cfg(test)]
pub use repository::MockFilmRepository;
