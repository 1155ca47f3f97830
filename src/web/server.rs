//! HTTP server for the panel

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{route_gate, AuthClient};
use crate::backend::BackendClient;
use crate::config::Config;
use crate::error::Result;

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub backend: BackendClient,
    pub auth: AuthClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let backend = BackendClient::new(&config.backend)?;
        let auth = AuthClient::new(backend.clone());
        Ok(Self {
            config,
            backend,
            auth,
        })
    }
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(config)?);

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // API routes (not gated)
        .route("/api/health", get(routes::health))
        .route("/api/auth/register", post(routes::register))
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/verify-otp", post(routes::verify_otp))
        .route("/api/auth/logout", post(routes::logout))
        // Pages
        .route("/", get(routes::page))
        .route("/login", get(routes::page))
        .route("/register", get(routes::page))
        .route("/dashboard", get(routes::page))
        .route("/profile", get(routes::page))
        .route("/settings", get(routes::page))
        .route("/admin/organisations", get(routes::admin_organisations))
        .route("/admin/users", get(routes::admin_users))
        .route("/admin/roles", get(routes::admin_roles))
        .route("/admin/permissions", get(routes::admin_permissions))
        .route("/manager/dashboard", get(routes::manager_dashboard))
        .route("/manager/salons", get(routes::manager_salons))
        .route("/manager/employees", get(routes::manager_employees))
        .route(
            "/manager/organisations/{id}/salons",
            get(routes::organisation_salons),
        )
        .route(
            "/manager/organisations/{id}/earnings",
            get(routes::organisation_earnings),
        )
        .route("/staff/appointments", get(routes::staff_appointments))
        .route("/staff/procedures", get(routes::staff_procedures))
        .route("/staff/availability", get(routes::staff_availability))
        .fallback(routes::not_found)
        // Middleware
        .layer(middleware::from_fn(route_gate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
