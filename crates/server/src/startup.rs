use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_default();

    // Pool settings come from config.toml when present; DATABASE_URL otherwise
    let cfg = configs::AppConfig::load_and_validate().ok();
    let db = match &cfg {
        Some(c) => models::db::connect_with(&c.database).await?,
        None => models::db::connect().await?,
    };

    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");

    let mut auth_cfg = cfg.map(|c| c.auth).unwrap_or_default();
    auth_cfg.normalize_from_env();
    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig {
            jwt_secret: auth_cfg.jwt_secret,
            token_hours: auth_cfg.token_hours,
        },
    };

    let app: Router = routes::build_router(build_cors(), state);

    let addr = load_bind_addr()?;
    info!(%addr, "starting rating server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
