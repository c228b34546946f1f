//! HTTP surface of the service.
//!
//! The gateway only translates: it authenticates through
//! [`SessionManager`](crate::SessionManager), decodes and shape-checks JSON
//! bodies, calls into the credential store or the roster engine, and renders
//! results and errors as JSON. All state lives behind the services in
//! [`AppState`].

mod auth;
mod error;
mod handlers;

use axum::routing::{delete, get, post, put};
use axum::{middleware, Router};
use sea_orm::DatabaseConnection;

use crate::{CredentialStore, RosterEngine, SessionManager};

pub use auth::require_session;

/// Service handles shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub credentials: CredentialStore,
    pub sessions: SessionManager,
    pub roster: RosterEngine,
}

impl AppState {
    /// Builds every service over one connection pool with default settings.
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            credentials: CredentialStore::new(conn.clone()),
            sessions: SessionManager::new(conn.clone()),
            roster: RosterEngine::new(conn),
        }
    }
}

/// Builds the application router.
///
/// Routes other than `/health`, `/register` and `/login` sit behind
/// [`require_session`], which resolves the `Authorization: Token <token>`
/// header before the handler runs.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/logout", post(handlers::logout))
        .route("/students", get(handlers::list_students))
        .route("/students/add", post(handlers::add_student))
        .route("/students/update-marks", put(handlers::update_marks))
        .route("/students/delete", delete(handlers::delete_student))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(protected)
        .with_state(state)
}
