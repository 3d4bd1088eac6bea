//! Core node routes: `/State`, `/Uptime` and `/Version`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::NodeResult;
use crate::state::NodeContext;
use crate::uptime::UptimeReport;
use crate::version::VersionInfo;

/// Create the router for the core node endpoints.
pub fn core_routes(context: NodeContext) -> Router {
    Router::new()
        .route("/State", get(get_state))
        .route("/Uptime", get(get_uptime))
        .route("/Version", get(get_version))
        .with_state(context)
}

/// Handle GET /State - plain-text health state.
pub async fn get_state(State(context): State<NodeContext>) -> &'static str {
    context.health().as_str()
}

/// Handle GET /Uptime - time since the last boot.
pub async fn get_uptime(State(context): State<NodeContext>) -> NodeResult<Json<UptimeReport>> {
    context.uptime().await.map(Json)
}

/// Handle GET /Version - service and info versions.
pub async fn get_version(State(context): State<NodeContext>) -> NodeResult<Json<VersionInfo>> {
    context.version().await.map(Json)
}
