//! Backend for a student group directory.
//!
//! Public clients browse and fuzzy-search the directory; admins authenticate
//! with a shared secret to create, edit, pin, and delete entries.
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Access |
//! |---|---|---|
//! | POST | `/api/admin/login` | public, lockout-guarded |
//! | GET | `/api/admin/status` | public |
//! | GET | `/api/groups?q=` | public |
//! | POST / PUT | `/api/groups` | admin token |
//! | DELETE | `/api/groups/{id}` | admin token |
//! | POST | `/api/groups/pin` | admin token |
//! | GET | `/api/important-links` | public |
//! | POST / PUT | `/api/important-links` | admin token |
//! | DELETE | `/api/important-links/{id}` | admin token |
//!
//!
//!
//! # Brute-force protection
//!
//! Admin login runs through a process-wide lockout guard: three wrong
//! passwords lock the login for four hours (see [`guard`]). The comparison
//! is constant-time and the guard fails closed when no password is
//! configured. Lockout and session state are in-memory only; a restart
//! clears both.
//!
//!
//!
//! # Configuration
//!
//! Everything comes from the environment:
//! - `RUST_PORT` (default 1111)
//! - `ADMIN_PASSWORD` (unset disables admin login)
//! - `ADMIN_MAX_ATTEMPTS` (default 3)
//! - `ADMIN_LOCKOUT_SECS` (default 14400)
//! - `RUST_LOG` for the tracing filter
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{delete, get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod guard;
pub mod routes;
pub mod search;
pub mod sessions;
pub mod state;
pub mod store;
pub mod utils;

use config::Config;
use routes::{
    admin_login, admin_status, create_group, create_link, delete_group, delete_link, list_groups,
    list_links, pin_group, update_group, update_link,
};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(
            "/api/groups",
            get(list_groups).post(create_group).put(update_group),
        )
        .route("/api/groups/{id}", delete(delete_group))
        .route("/api/groups/pin", post(pin_group))
        .route(
            "/api/important-links",
            get(list_links).post(create_link).put(update_link),
        )
        .route("/api/important-links/{id}", delete(delete_link))
        .route("/api/admin/login", post(admin_login))
        .route("/api/admin/status", get(admin_status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new(Config::load());

    info!("Starting server...");
    let router = app(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
