//! Storage infrastructure - PostgreSQL connectivity and schema migrations

pub mod migrations;
mod postgres;

pub use migrations::{
    film_catalog_migrations, run_migrations, Migration, Migrator, PostgresMigrator,
};
pub use postgres::{connect, is_unique_violation, map_write_error, PostgresConfig};
