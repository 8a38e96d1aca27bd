use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};

use service::errors::ServiceError;
use service::movie::domain::MovieDto;
use service::movie::repository::SeaOrmMovieRepository;
use service::score::domain::ScoreDto;
use service::score::repository::SeaOrmScoreRepository;
use service::score::ScoreService;
use service::user::repository::SeaOrmUserRepository;
use service::user::UserService;

use super::auth::{CurrentUser, ServerState, TokenPrincipal};
use crate::errors::ApiError;

/// PUT /scores: the authenticated user scores a movie; responds with the
/// movie carrying the recomputed average.
pub async fn save_score(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<ScoreDto>,
) -> Result<Json<MovieDto>, ApiError> {
    if !(0.0..=5.0).contains(&input.score) {
        return Err(ServiceError::Validation("score must be between 0 and 5".into()).into());
    }
    let users = UserService::new(
        Arc::new(SeaOrmUserRepository { db: state.db.clone() }),
        Arc::new(TokenPrincipal(Some(current.0))),
    );
    let svc = ScoreService::new(
        Arc::new(SeaOrmScoreRepository { db: state.db.clone() }),
        Arc::new(SeaOrmMovieRepository { db: state.db.clone() }),
        users,
    );
    Ok(Json(svc.save_score(input).await?))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use sea_orm::DatabaseConnection;
    use tower::util::ServiceExt;
    use tower_http::cors::CorsLayer;

    use super::super::auth::{Claims, ServerAuthConfig, ServerState};

    const SECRET: &str = "test-secret";

    fn bearer() -> String {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
        let claims = Claims { sub: "alex@example.com".into(), exp };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        format!("Bearer {token}")
    }

    fn app() -> axum::Router {
        let state = ServerState {
            db: DatabaseConnection::default(),
            auth: ServerAuthConfig { jwt_secret: SECRET.into(), token_hours: 1 },
        };
        crate::routes::build_router(CorsLayer::new(), state)
    }

    // The range check runs before any repository access, so a disconnected
    // database is enough to exercise it.
    #[tokio::test]
    async fn out_of_range_score_is_unprocessable() {
        let res = app()
            .oneshot(
                HttpRequest::builder()
                    .method("PUT")
                    .uri("/scores")
                    .header("authorization", bearer())
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"movie_id":1,"score":10.0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
