use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use kanban_api::{
    auth::TokenKeys,
    config::{Config, StorageBackend},
    middleware::{CatchPanic, RequestIdMiddleware},
    repository::{
        sqlite, BoardStore, MemBoardStore, MemUserStore, SqliteBoardStore, SqliteUserStore,
        UserStore,
    },
    routes::{self, health},
    services::{AuthService, BoardService},
};

/// request id, peer, request line, status, size, latency, user agent
const LOG_FORMAT: &str = r#"%{x-request-id}o %a "%r" %s %b %Dms "%{User-Agent}i""#;

const SQLITE_MAX_CONNECTIONS: u32 = 5;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    if config.uses_dev_secret() {
        log::warn!("JWT_SECRET is not set; using the built-in development secret, which is unsafe for production");
    }

    let (users, boards): (Arc<dyn UserStore>, Arc<dyn BoardStore>) = match config.storage {
        StorageBackend::Memory => (Arc::new(MemUserStore::new()), Arc::new(MemBoardStore::new())),
        StorageBackend::Sqlite => {
            let pool = sqlite::connect(&config.database_url, SQLITE_MAX_CONNECTIONS)
                .await
                .map_err(|e| {
                    log::error!("failed to open {}: {}", config.database_url, e);
                    io::Error::new(io::ErrorKind::Other, e)
                })?;
            (
                Arc::new(SqliteUserStore::new(pool.clone())),
                Arc::new(SqliteBoardStore::new(pool)),
            )
        }
    };
    log::info!("storage backend: {:?}", config.storage);

    let keys = Arc::new(TokenKeys::new(config.jwt_secret.as_bytes(), config.token_ttl));
    log::info!("access tokens expire after {}h", keys.ttl().num_hours());
    let auth_service = web::Data::new(AuthService::new(users, Arc::clone(&keys)));
    let board_service = web::Data::new(BoardService::new(boards));
    let storage = web::Data::new(config.storage);

    log::info!("starting kanban-api at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .app_data(auth_service.clone())
            .app_data(board_service.clone())
            .app_data(storage.clone())
            // Innermost first: panics are caught inside the request id scope,
            // and the logger sees the echoed X-Request-Id header.
            .wrap(CatchPanic)
            .wrap(RequestIdMiddleware)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::new(LOG_FORMAT))
            .service(health::health)
            .service(web::scope("/api/v1").configure(routes::config(Arc::clone(&keys))))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
