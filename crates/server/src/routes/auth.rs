use std::sync::Arc;

use argon2::{password_hash::PasswordVerifier, Argon2, PasswordHash};
use axum::extract::{Request, State};
use axum::http::{header::AUTHORIZATION, Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use service::errors::ServiceError;
use service::user::repository::SeaOrmUserRepository;
use service::user::{Principal, UserService};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_hours: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Username extracted from a verified bearer token, injected into request
/// extensions by the middleware below.
#[derive(Clone)]
pub struct CurrentUser(pub String);

/// Principal backed by the token-derived username (or absent for anonymous
/// requests).
pub struct TokenPrincipal(pub Option<String>);

impl Principal for TokenPrincipal {
    fn username(&self) -> Result<String, ServiceError> {
        self.0
            .clone()
            .ok_or_else(|| ServiceError::Unauthorized("no authenticated principal".into()))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub username: String,
    pub token: String,
}

pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginOutput>, ApiError> {
    let repo = Arc::new(SeaOrmUserRepository { db: state.db.clone() });
    let users = UserService::new(repo, Arc::new(TokenPrincipal(None)));
    let details = users.load_user_by_username(&input.username).await?;

    let parsed = PasswordHash::new(&details.password)
        .map_err(|_| ServiceError::Unauthorized("invalid credentials".to_string()))?;
    if Argon2::default()
        .verify_password(input.password.as_bytes(), &parsed)
        .is_err()
    {
        return Err(ServiceError::Unauthorized("invalid credentials".to_string()).into());
    }

    let exp = (chrono::Utc::now() + chrono::Duration::hours(state.auth.token_hours)).timestamp()
        as usize;
    let claims = Claims { sub: details.username.clone(), exp };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| ServiceError::Db(format!("token error: {e}")))?;

    info!(username = %details.username, "user_logged_in");
    Ok(Json(LoginOutput { username: details.username, token }))
}

/// Global middleware: reads are public; health, login and CORS preflight are
/// whitelisted; every other request needs `Authorization: Bearer <token>`.
/// A missing token is a 400, an invalid or expired one a 401.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    if path == "/health"
        || path == "/auth/login"
        || method == Method::OPTIONS
        || method == Method::GET
    {
        return Ok(next.run(req).await);
    }

    let token = match req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(h) => {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(StatusCode::UNAUTHORIZED);
            }
            h[prefix.len()..].to_string()
        }
        None => {
            warn!(path = %path, "missing Authorization header");
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    match decode::<Claims>(&token, &key, &validation) {
        Ok(data) => {
            req.extensions_mut().insert(CurrentUser(data.claims.sub));
            Ok(next.run(req).await)
        }
        Err(e) => {
            error!(path = %path, err = %e, "token validation failed");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use tower::util::ServiceExt;
    use tower_http::cors::CorsLayer;

    fn test_state() -> ServerState {
        ServerState {
            db: DatabaseConnection::default(),
            auth: ServerAuthConfig { jwt_secret: "test-secret".into(), token_hours: 1 },
        }
    }

    fn app() -> axum::Router {
        crate::routes::build_router(CorsLayer::new(), test_state())
    }

    #[tokio::test]
    async fn health_is_public() {
        let res = app()
            .oneshot(HttpRequest::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_token_is_bad_request() {
        let res = app()
            .oneshot(
                HttpRequest::builder()
                    .method("PUT")
                    .uri("/scores")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"movie_id":1,"score":4.0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_token_is_unauthorized() {
        let res = app()
            .oneshot(
                HttpRequest::builder()
                    .method("PUT")
                    .uri("/scores")
                    .header("authorization", "Bearer not-a-jwt")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"movie_id":1,"score":4.0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let res = app()
            .oneshot(
                HttpRequest::builder()
                    .method("DELETE")
                    .uri("/movies/1")
                    .header("authorization", "Basic abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
