use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use service::movie::domain::{MovieDto, MovieInput};
use service::movie::repository::SeaOrmMovieRepository;
use service::movie::MovieService;
use service::pagination::{Page, Pagination};

use super::auth::ServerState;
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct MovieSearchQuery {
    #[serde(default)]
    pub title: String,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn movie_service(state: &ServerState) -> MovieService<SeaOrmMovieRepository> {
    MovieService::new(Arc::new(SeaOrmMovieRepository { db: state.db.clone() }))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<MovieSearchQuery>,
) -> Result<Json<Page<MovieDto>>, ApiError> {
    let page = Pagination {
        page: q.page.unwrap_or(1),
        per_page: q.per_page.unwrap_or(20),
    };
    Ok(Json(movie_service(&state).find_all(&q.title, page).await?))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<MovieDto>, ApiError> {
    Ok(Json(movie_service(&state).find_by_id(id).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<MovieInput>,
) -> Result<(StatusCode, Json<MovieDto>), ApiError> {
    let created = movie_service(&state).insert(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(input): Json<MovieInput>,
) -> Result<Json<MovieDto>, ApiError> {
    Ok(Json(movie_service(&state).update(id, input).await?))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    movie_service(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
