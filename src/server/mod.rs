//! Weight Gateway HTTP server.
//!
//! Routes the four HTTP-facing operations to the flow controller.

pub mod handlers;

use axum::{
    routing::{get, post},
    Router as AxumRouter,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::{OAuthClient, OAuthConfig, SessionStore};
use crate::fitbit::{WeightClient, WeightConfig};
use crate::flow::FlowController;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<FlowController>,
}

/// Build the gateway router over an existing flow controller.
pub fn router(flow: FlowController) -> AxumRouter {
    let state = Arc::new(AppState {
        flow: Arc::new(flow),
    });

    AxumRouter::new()
        .route("/", get(handlers::root))
        .route("/login", get(handlers::login))
        .route("/callback", get(handlers::callback))
        .route("/add_weight", post(handlers::add_weight))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Weight Gateway HTTP server.
///
/// Reads provider configuration from the environment and sets up routes for
/// the relay operations:
/// - GET  /         - Redirect to /login
/// - GET  /login    - Begin the Fitbit login flow
/// - GET  /callback - OAuth callback (code-for-token exchange)
/// - POST /add_weight - Forward a weight measurement
///
/// # Errors
/// Returns error if provider configuration is missing or server binding
/// fails.
pub async fn start_server(host: &str, port: u16) -> anyhow::Result<()> {
    let oauth = OAuthClient::new(OAuthConfig::fitbit()?)?;
    let weight = WeightClient::new(WeightConfig::fitbit())?;
    let flow = FlowController::new(SessionStore::new(), oauth, weight);

    let app = router(flow);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    info!("[INFO] Weight Gateway listening on {}", addr);
    info!("[INFO] Available endpoints:");
    info!("  GET    /            - Redirect to /login");
    info!("  GET    /login       - Begin the Fitbit login flow");
    info!("  GET    /callback    - OAuth callback handler");
    info!("  POST   /add_weight  - Forward a weight measurement");

    axum::serve(listener, app).await?;

    Ok(())
}
