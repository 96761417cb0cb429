use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod account;
mod anime;
pub mod auth;
mod collections;
mod error;
mod extract;
mod observability;
mod types;
mod validation;

pub use error::ApiError;
pub use extract::JsonBody;
pub use types::*;

use crate::services::{AccountService, AnimeService, CollectionService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        self.shared.config()
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn account_service(&self) -> &Arc<dyn AccountService> {
        &self.shared.account_service
    }

    #[must_use]
    pub fn anime_service(&self) -> &Arc<dyn AnimeService> {
        &self.shared.anime_service
    }

    #[must_use]
    pub fn collection_service(&self) -> &Arc<dyn CollectionService> {
        &self.shared.collection_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config().server;

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_ttl_minutes,
        )));

    let cors_origins = &server.cors_allowed_origins;
    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    let logged_out_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route_layer(middleware::from_fn(auth::require_logout));

    Router::new()
        .merge(create_protected_router())
        .merge(logged_out_routes)
        .route("/health", get(observability::health))
        .route("/metrics", get(observability::get_metrics))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(session_layer)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/logout", get(auth::logout))
        .route("/changePassword", post(auth::change_password))
        .route("/profile", get(account::get_profile))
        .route("/purchaseCredits", post(account::purchase_credits))
        .route("/getAnime", get(anime::list_anime))
        .route("/getAnimeByStatus", get(anime::list_anime_by_status))
        .route("/searchAnime", get(anime::search_anime))
        .route("/addAnime", post(anime::add_anime))
        .route("/updateAnime", post(anime::update_anime))
        .route("/deleteAnime", post(anime::delete_anime))
        .route("/getCollections", get(collections::list_collections))
        .route(
            "/createCollection",
            post(collections::create_collection)
                .route_layer(middleware::from_fn(collections::require_premium)),
        )
        .route("/updateCollection", post(collections::update_collection))
        .route("/deleteCollection", post(collections::delete_collection))
        .route(
            "/addAnimeToCollection",
            post(collections::add_anime_to_collection),
        )
        .route(
            "/removeAnimeFromCollection",
            post(collections::remove_anime_from_collection),
        )
        .route_layer(middleware::from_fn(auth::require_login))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
