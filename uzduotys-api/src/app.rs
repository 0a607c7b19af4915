/// Application state and router builder
///
/// State is an explicitly constructed context object handed to every
/// handler through axum's `State` extractor; there are no process-wide
/// singletons.

use axum::{
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use uzduotys_shared::mail::Mailer;

use crate::config::Config;

/// Shared application state
///
/// Cloned per request; the pool and mailer are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Outbound mail capability (SMTP or logging stub)
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            mailer,
        }
    }

    /// Secret used for session and reset-token signing
    pub fn secret(&self) -> &str {
        &self.config.secret_key
    }
}

/// Builds the complete router
///
/// # Routes
///
/// ```text
/// /
/// ├── GET       /                           # landing page (public)
/// ├── GET       /healthz                    # liveness probe (public)
/// ├── GET,POST  /registruotis               # register (public)
/// ├── GET,POST  /prisijungti                # login (public)
/// ├── GET       /atsijungti                 # logout
/// ├── GET       /uzduotys                   # task list (auth)
/// ├── GET,POST  /uzduotys/nauja             # create task (auth)
/// ├── GET,POST  /uzduotys/redaguoti/:id     # edit task (auth, owner)
/// ├── GET,POST  /uzduotys/istrinti/:id      # delete task (auth, owner)
/// ├── GET,POST  /reset_password             # request reset (public)
/// └── GET,POST  /reset_password/:token      # complete reset (public)
/// ```
///
/// Authentication is enforced per handler by the `CurrentUser`
/// extractor rather than a middleware layer, so the redirect can carry
/// the originally requested path.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    Router::new()
        .route("/", get(routes::pages::index))
        .route("/healthz", get(routes::pages::healthz))
        .route(
            "/registruotis",
            get(routes::auth::register_form).post(routes::auth::register),
        )
        .route(
            "/prisijungti",
            get(routes::auth::login_form).post(routes::auth::login),
        )
        .route("/atsijungti", get(routes::auth::logout))
        .route("/uzduotys", get(routes::tasks::list))
        .route(
            "/uzduotys/nauja",
            get(routes::tasks::new_form).post(routes::tasks::create),
        )
        .route(
            "/uzduotys/redaguoti/:id",
            get(routes::tasks::edit_form).post(routes::tasks::update),
        )
        .route(
            "/uzduotys/istrinti/:id",
            get(routes::tasks::delete_form).post(routes::tasks::delete),
        )
        .route(
            "/reset_password",
            get(routes::password_reset::request_form).post(routes::password_reset::request),
        )
        .route(
            "/reset_password/:token",
            get(routes::password_reset::complete_form).post(routes::password_reset::complete),
        )
        .fallback(routes::pages::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
