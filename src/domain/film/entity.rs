//! Film entity and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::{User, UserId};

/// Film identifier assigned by the film store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilmId(i64);

impl FilmId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for FilmId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FilmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A film that has not been persisted yet
#[derive(Debug, Clone, Default)]
pub struct NewFilm {
    pub owner_id: UserId,
    pub title: String,
    pub director: String,
    pub cast: String,
    pub genre: String,
    pub synopsis: String,
    pub release_date: Option<NaiveDate>,
}

/// Film record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Film {
    id: FilmId,
    /// Creator of the record, immutable after creation
    owner_id: UserId,
    title: String,
    director: String,
    cast: String,
    genre: String,
    synopsis: String,
    /// `None` when the release date is unknown
    release_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Film {
    /// Attach a store-assigned identity to a new film
    pub fn from_new(id: FilmId, new_film: NewFilm) -> Self {
        let now = Utc::now();

        Self {
            id,
            owner_id: new_film.owner_id,
            title: new_film.title,
            director: new_film.director,
            cast: new_film.cast,
            genre: new_film.genre,
            synopsis: new_film.synopsis,
            release_date: new_film.release_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Override the store-maintained timestamps
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // Getters

    pub fn id(&self) -> FilmId {
        self.id
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn director(&self) -> &str {
        &self.director
    }

    pub fn cast(&self) -> &str {
        &self.cast
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn synopsis(&self) -> &str {
        &self.synopsis
    }

    pub fn release_date(&self) -> Option<NaiveDate> {
        self.release_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Merge the present fields of `update` into this film
    ///
    /// Absent fields are left untouched. Returns whether the title changed.
    pub fn apply(&mut self, update: FilmUpdate) -> bool {
        let mut title_changed = false;

        if let Some(title) = update.title {
            title_changed = title != self.title;
            self.title = title;
        }

        if let Some(director) = update.director {
            self.director = director;
        }

        if let Some(release_date) = update.release_date {
            self.release_date = Some(release_date);
        }

        if let Some(cast) = update.cast {
            self.cast = cast;
        }

        if let Some(genre) = update.genre {
            self.genre = genre;
        }

        if let Some(synopsis) = update.synopsis {
            self.synopsis = synopsis;
        }

        self.touch();
        title_changed
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Partial update of the mutable film fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilmUpdate {
    pub title: Option<String>,
    pub director: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub cast: Option<String>,
    pub genre: Option<String>,
    pub synopsis: Option<String>,
}

impl FilmUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Public identity of a film's owner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmOwner {
    pub id: UserId,
    pub username: String,
}

impl From<&User> for FilmOwner {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            username: user.username().to_string(),
        }
    }
}

/// Film together with its owner's public fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmDetails {
    #[serde(flatten)]
    pub film: Film,
    pub owner: FilmOwner,
}

/// Listing filters, combined with logical AND
///
/// Empty strings are treated as "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilmFilter {
    /// Substring match on title
    pub title: Option<String>,
    /// Exact match on genre
    pub genre: Option<String>,
    /// Exact match on release date
    pub release_date: Option<NaiveDate>,
}

impl FilmFilter {
    pub fn new(
        title: Option<String>,
        genre: Option<String>,
        release_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            title: title.filter(|t| !t.is_empty()),
            genre: genre.filter(|g| !g.is_empty()),
            release_date,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.genre.is_none() && self.release_date.is_none()
    }

    /// Check whether a film satisfies every present constraint
    pub fn matches(&self, film: &Film) -> bool {
        if let Some(title) = &self.title {
            if !film.title().contains(title.as_str()) {
                return false;
            }
        }

        if let Some(genre) = &self.genre {
            if film.genre() != genre {
                return false;
            }
        }

        if let Some(release_date) = self.release_date {
            if film.release_date() != Some(release_date) {
                return false;
            }
        }

        true
    }
}
