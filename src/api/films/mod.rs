//! Film catalog endpoints
//!
//! Every route requires a bearer token; mutations are restricted to the
//! film's creator by the film service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::film::{Film, FilmDetails, FilmFilter, FilmId, FilmUpdate, NewFilm};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Create the films router
pub fn create_films_router() -> Router<AppState> {
    Router::new()
        .route("/films", get(list_films).post(create_film))
        .route(
            "/films/{id}",
            get(get_film).put(update_film).delete(delete_film),
        )
}

/// Listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListFilmsQuery {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
}

/// Create film request
#[derive(Debug, Deserialize)]
pub struct CreateFilmRequest {
    pub title: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub cast: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub synopsis: String,
}

/// Update film request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFilmRequest {
    pub title: Option<String>,
    pub director: Option<String>,
    pub release_date: Option<String>,
    pub cast: Option<String>,
    pub genre: Option<String>,
    pub synopsis: Option<String>,
}

/// Parse an optional `YYYY-MM-DD` value; empty means absent
fn parse_release_date(value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                ApiError::bad_request("invalid release_date format, expected YYYY-MM-DD")
                    .with_code("invalid_date")
            }),
    }
}

/// Ids are unsigned; a well-formed id that names no film is a 404
fn parse_film_id(raw: &str) -> Result<FilmId, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id >= 0)
        .map(FilmId::new)
        .ok_or_else(|| ApiError::bad_request("invalid film ID").with_code("invalid_id"))
}

impl TryFrom<UpdateFilmRequest> for FilmUpdate {
    type Error = ApiError;

    fn try_from(request: UpdateFilmRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            release_date: parse_release_date(request.release_date.as_deref())?,
            title: request.title,
            director: request.director,
            cast: request.cast,
            genre: request.genre,
            synopsis: request.synopsis,
        })
    }
}

/// GET /films
pub async fn list_films(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Query(query): Query<ListFilmsQuery>,
) -> Result<Json<Vec<Film>>, ApiError> {
    let release_date = parse_release_date(query.release_date.as_deref())?;
    let filter = FilmFilter::new(query.title, query.genre, release_date);

    debug!(?filter, "Listing films");

    let films = state.film_service.list(filter).await?;

    Ok(Json(films))
}

/// GET /films/{id}
pub async fn get_film(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FilmDetails>, ApiError> {
    let id = parse_film_id(&id)?;
    let details = state.film_service.get_details(id).await?;

    Ok(Json(details))
}

/// POST /films
pub async fn create_film(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Json(request): Json<CreateFilmRequest>,
) -> Result<(StatusCode, Json<Film>), ApiError> {
    let release_date = parse_release_date(request.release_date.as_deref())?;

    let film = state
        .film_service
        .create(NewFilm {
            owner_id: user.id(),
            title: request.title,
            director: request.director,
            cast: request.cast,
            genre: request.genre,
            synopsis: request.synopsis,
            release_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(film)))
}

/// PUT /films/{id}
pub async fn update_film(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateFilmRequest>,
) -> Result<Json<Film>, ApiError> {
    let id = parse_film_id(&id)?;
    let update = FilmUpdate::try_from(request)?;

    let film = state.film_service.update(id, user.id(), update).await?;

    Ok(Json(film))
}

/// DELETE /films/{id}
pub async fn delete_film(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_film_id(&id)?;
    state.film_service.delete(id, user.id()).await?;

    Ok(StatusCode::NO_CONTENT)
}
