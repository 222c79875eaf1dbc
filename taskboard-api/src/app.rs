/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_api::{app::{build_router, AppState}, config::Config};
/// use taskboard_shared::{db::pool::create_pool, store::PgStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, routes};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use taskboard_shared::{auth::middleware::create_jwt_middleware, store::EntityStore};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend
    pub store: Arc<dyn EntityStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn EntityStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                              # Health check (public)
/// └── /api/
///     ├── /auth/                           # Public
///     │   ├── POST /registration
///     │   ├── POST /login
///     │   └── POST /refresh
///     ├── /profiles                        # Bearer token
///     │   ├── GET|POST /
///     │   └── GET|PATCH|DELETE /:user_id
///     ├── /boards                          # Bearer token
///     │   ├── GET|POST /
///     │   ├── GET /email-check?email=
///     │   └── GET|PATCH|DELETE /:board_id
///     └── /tasks                           # Bearer token
///         ├── POST /
///         ├── GET /assigned-to-me
///         ├── GET /reviewing
///         ├── GET|PATCH|DELETE /:task_id
///         ├── GET|POST /:task_id/comments
///         └── GET|PATCH|DELETE /:task_id/comments/:comment_id
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Bearer token resolution on profile, board and task routes. A missing
///    token leaves the request anonymous; the operations reject it with 401.
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/registration", post(routes::auth::registration))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let profile_routes = Router::new()
        .route(
            "/",
            get(routes::profiles::list_profiles).post(routes::profiles::create_profile),
        )
        .route(
            "/:user_id",
            get(routes::profiles::get_profile)
                .patch(routes::profiles::update_profile)
                .delete(routes::profiles::delete_profile),
        );

    let board_routes = Router::new()
        .route(
            "/",
            get(routes::boards::list_boards).post(routes::boards::create_board),
        )
        .route("/email-check", get(routes::boards::email_check))
        .route(
            "/:board_id",
            get(routes::boards::get_board)
                .patch(routes::boards::update_board)
                .delete(routes::boards::delete_board),
        );

    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route("/assigned-to-me", get(routes::tasks::assigned_to_me))
        .route("/reviewing", get(routes::tasks::reviewing))
        .route(
            "/:task_id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/:task_id/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        )
        .route(
            "/:task_id/comments/:comment_id",
            get(routes::comments::get_comment)
                .patch(routes::comments::update_comment)
                .delete(routes::comments::delete_comment),
        );

    let protected_routes = Router::new()
        .nest("/profiles", profile_routes)
        .nest("/boards", board_routes)
        .nest("/tasks", task_routes)
        .layer(middleware::from_fn(create_jwt_middleware(
            state.jwt_secret().to_string(),
        )));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
