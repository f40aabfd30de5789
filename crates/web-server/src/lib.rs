use axum::{
    routing::{get, post},
    Router,
};
use configuration::Config;
use database::{DbRepository, PriceConjunction};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
// Note: Tracing is initialized by the binary before the server starts.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod session;
pub mod store;

use auth::{BcryptHasher, CredentialHasher};
use session::{MemorySessionStore, SessionStore};
use store::{ListingStore, UserStore};

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub listings: Arc<dyn ListingStore>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub sessions: Arc<dyn SessionStore>,
    pub search: configuration::Search,
}

impl AppState {
    /// Wires the Postgres repository, bcrypt and in-memory sessions together.
    pub fn from_repository(repo: DbRepository, config: &Config) -> Self {
        let repo = Arc::new(repo);
        Self {
            users: repo.clone(),
            listings: repo,
            hasher: Arc::new(BcryptHasher::new(config.auth.bcrypt_cost)),
            sessions: Arc::new(MemorySessionStore::new()),
            search: config.search.clone(),
        }
    }
}

/// Builds the application routes on top of `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let users = Router::new()
        .route("/", post(handlers::create_user))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me));

    let api = Router::new()
        .route(
            "/properties",
            get(handlers::search_properties).post(handlers::create_property),
        )
        .route("/reservations", get(handlers::get_reservations));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/users", users)
        .nest("/api", api)
        .with_state(state)
}

/// The main function to configure and run the web server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let db_pool = database::connect(&config.database).await?;
    let repo = DbRepository::new(db_pool).with_price_conjunction(
        PriceConjunction::from_legacy_flag(config.search.legacy_price_conjunction),
    );
    let app_state = Arc::new(AppState::from_repository(repo, &config));

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    let app = router(app_state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Web server started and listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
