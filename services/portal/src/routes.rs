//! HTTP surface.
//!
//! Handlers stay thin: parse input, run the orchestrator, hand the flat
//! payload to the response layer.

use crate::auth::{Principal, TokenVerifier};
use crate::error::ApiError;
use crate::flow::Portal;
use crate::view::{ProfileView, ViewPayload};
use axum::extract::{Form, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use identity_client::GraphClient;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Portal orchestrator
    pub portal: Arc<Portal>,
    /// Profile graph client
    pub graph: Arc<GraphClient>,
    /// Bearer token verifier
    pub verifier: Arc<TokenVerifier>,
}

/// Build the portal router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/search", post(search_handler))
        .route("/profile", get(profile_handler))
        .route("/healthz", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Search form input.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Hostname to look up as a secret identifier
    #[serde(default)]
    pub hostname: String,
}

async fn index_handler(State(state): State<AppState>, principal: Principal) -> Json<ViewPayload> {
    Json(state.portal.index(&principal.claims).await)
}

async fn search_handler(
    State(state): State<AppState>,
    principal: Principal,
    Form(request): Form<SearchRequest>,
) -> Json<ViewPayload> {
    Json(state.portal.search(&principal.claims, &request.hostname).await)
}

async fn profile_handler(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ProfileView>, ApiError> {
    if principal.claims.is_empty() {
        return Err(ApiError::Unauthenticated);
    }

    let me = state.graph.get_current_user().await?;
    let photo = state.graph.get_current_user_photo().await?;

    Ok(Json(ProfileView {
        display_name: me.display_name,
        user_principal_name: me.user_principal_name,
        mail: me.mail,
        job_title: me.job_title,
        photo,
    }))
}

async fn health_handler() -> &'static str {
    "ok"
}
