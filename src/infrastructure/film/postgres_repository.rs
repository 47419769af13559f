//! PostgreSQL film repository implementation

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::domain::film::{
    Film, FilmDetails, FilmFilter, FilmId, FilmOwner, FilmRepository, NewFilm,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::map_write_error;

const FILM_COLUMNS: &str = r#"f.id, f.user_id, f.title, f.director, f."cast", f.genre,
       f.synopsis, f.release_date, f.created_at, f.updated_at"#;

/// PostgreSQL implementation of FilmRepository
#[derive(Debug, Clone)]
pub struct PostgresFilmRepository {
    pool: PgPool,
}

impl PostgresFilmRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE metacharacters so the title filter matches a literal substring
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Build the listing query; absent filters add no predicate
fn build_find_query(filter: &FilmFilter) -> QueryBuilder<'_, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT {} FROM films f WHERE TRUE", FILM_COLUMNS));

    if let Some(title) = &filter.title {
        query
            .push(" AND f.title LIKE '%' || ")
            .push_bind(escape_like(title))
            .push(" || '%' ESCAPE '\\'");
    }

    if let Some(genre) = &filter.genre {
        query.push(" AND f.genre = ").push_bind(genre.as_str());
    }

    if let Some(release_date) = filter.release_date {
        query.push(" AND f.release_date = ").push_bind(release_date);
    }

    query.push(" ORDER BY f.id");
    query
}

#[async_trait]
impl FilmRepository for PostgresFilmRepository {
    async fn find(&self, filter: &FilmFilter) -> Result<Vec<Film>, DomainError> {
        let rows = build_find_query(filter)
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list films: {}", e)))?;

        rows.iter().map(row_to_film).collect()
    }

    async fn get(&self, id: FilmId) -> Result<Option<Film>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM films f WHERE f.id = $1", FILM_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get film: {}", e)))?;

        row.as_ref().map(row_to_film).transpose()
    }

    async fn get_details(&self, id: FilmId) -> Result<Option<FilmDetails>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {}, u.username AS owner_username
            FROM films f
            JOIN users u ON u.id = f.user_id
            WHERE f.id = $1
            "#,
            FILM_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get film details: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let film = row_to_film(&row)?;
        let username: String = row
            .try_get("owner_username")
            .map_err(|e| DomainError::storage(format!("Invalid film row: {}", e)))?;

        Ok(Some(FilmDetails {
            owner: FilmOwner {
                id: film.owner_id(),
                username,
            },
            film,
        }))
    }

    async fn create(&self, film: NewFilm) -> Result<Film, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO films (user_id, title, director, "cast", genre, synopsis, release_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(film.owner_id.value())
        .bind(&film.title)
        .bind(&film.director)
        .bind(&film.cast)
        .bind(&film.genre)
        .bind(&film.synopsis)
        .bind(film.release_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "title", "Failed to create film"))?;

        let decode = |e: sqlx::Error| DomainError::storage(format!("Invalid film row: {}", e));
        let id: i64 = row.try_get("id").map_err(decode)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(decode)?;

        Ok(Film::from_new(FilmId::new(id), film).with_timestamps(created_at, updated_at))
    }

    async fn update(&self, film: &Film) -> Result<Film, DomainError> {
        // user_id is immutable after creation
        let row = sqlx::query(
            r#"
            UPDATE films
            SET title = $2, director = $3, "cast" = $4, genre = $5, synopsis = $6,
                release_date = $7, updated_at = $8
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(film.id().value())
        .bind(film.title())
        .bind(film.director())
        .bind(film.cast())
        .bind(film.genre())
        .bind(film.synopsis())
        .bind(film.release_date())
        .bind(film.updated_at())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "title", "Failed to update film"))?;

        match row {
            Some(_) => Ok(film.clone()),
            None => Err(DomainError::film_not_found(film.id().value())),
        }
    }

    async fn delete(&self, id: FilmId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM films WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete film: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::film_not_found(id.value()));
        }

        Ok(())
    }
}

fn row_to_film(row: &sqlx::postgres::PgRow) -> Result<Film, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Invalid film row: {}", e));

    let id: i64 = row.try_get("id").map_err(decode)?;
    let owner_id: i64 = row.try_get("user_id").map_err(decode)?;
    let release_date: Option<NaiveDate> = row.try_get("release_date").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(decode)?;

    let new_film = NewFilm {
        owner_id: UserId::new(owner_id),
        title: row.try_get("title").map_err(decode)?,
        director: row.try_get("director").map_err(decode)?,
        cast: row.try_get("cast").map_err(decode)?,
        genre: row.try_get("genre").map_err(decode)?,
        synopsis: row.try_get("synopsis").map_err(decode)?,
        release_date,
    };

    Ok(Film::from_new(FilmId::new(id), new_film).with_timestamps(created_at, updated_at))
}
