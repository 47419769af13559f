//! Film infrastructure module
//!
//! In-memory and PostgreSQL film stores plus the film service that applies
//! ownership and duplicate-title rules on top of them.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresFilmRepository;
pub use repository::InMemoryFilmRepository;
pub use service::FilmService;
