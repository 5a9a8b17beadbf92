use axum::{http::HeaderValue, routing::get, Json, Router};
use gigboard_db::AppState;
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod api;
mod schedule;

#[derive(Serialize)]
struct ApiStatus {
    status: &'static str,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Database connection
    let db_config = gigboard_db::DatabaseConfig::from_env();
    tracing::info!("connecting to database...");
    let db = gigboard_db::connect(&db_config)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("running database migrations...");
    gigboard_migration::Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    tracing::info!("migrations complete");

    let state = Arc::new(AppState { db });

    let api_routes = Router::new()
        .route(
            "/venues",
            get(api::venues::list_venues).post(api::venues::create_venue),
        )
        .route("/venues/recent", get(api::venues::recent_venues))
        .route("/venues/search", get(api::search::search_venues))
        .route("/venues/placesearch", get(api::search::placesearch_venues))
        .route(
            "/venues/{id}",
            get(api::venues::get_venue)
                .put(api::venues::update_venue)
                .delete(api::venues::delete_venue),
        )
        .route(
            "/artists",
            get(api::artists::list_artists).post(api::artists::create_artist),
        )
        .route("/artists/recent", get(api::artists::recent_artists))
        .route("/artists/search", get(api::search::search_artists))
        .route(
            "/artists/placesearch",
            get(api::search::placesearch_artists),
        )
        .route(
            "/artists/{id}",
            get(api::artists::get_artist)
                .put(api::artists::update_artist)
                .delete(api::artists::delete_artist),
        )
        .route(
            "/artists/{id}/availability",
            get(api::availability::list_windows).post(api::availability::add_window),
        )
        .route(
            "/availability/{id}",
            axum::routing::delete(api::availability::delete_window),
        )
        .route(
            "/shows",
            get(api::shows::list_shows).post(api::shows::create_show),
        )
        .route(
            "/shows/{id}",
            axum::routing::delete(api::shows::delete_show),
        );

    // CORS configuration — restrict to configured origins
    let cors = {
        let allowed_origins_str = std::env::var("CORS_ORIGINS").unwrap_or_default();
        if allowed_origins_str.is_empty() {
            // Default: allow same-origin only (no cross-origin)
            tracing::warn!("CORS_ORIGINS not set — defaulting to restrictive CORS. Set CORS_ORIGINS=http://localhost:3000 for dev.");
            let scheme = std::env::var("GIGBOARD_SCHEME").unwrap_or_else(|_| "https".to_string());
            let domain =
                std::env::var("GIGBOARD_DOMAIN").unwrap_or_else(|_| "localhost:8080".to_string());
            let origin = format!("{scheme}://{domain}");
            CorsLayer::new()
                .allow_origin(AllowOrigin::exact(
                    HeaderValue::from_str(&origin)
                        .unwrap_or_else(|_| HeaderValue::from_static("https://localhost")),
                ))
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers(tower_http::cors::Any)
        } else {
            let origins: Vec<HeaderValue> = allowed_origins_str
                .split(',')
                .filter_map(|s| HeaderValue::from_str(s.trim()).ok())
                .collect();
            tracing::info!("CORS allowed origins: {:?}", origins);
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers(tower_http::cors::Any)
        }
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    tracing::info!(%addr, "server started");

    axum::serve(
        tokio::net::TcpListener::bind(addr).await.unwrap(),
        app.into_make_service(),
    )
    .await
    .unwrap();
}

async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus { status: "ok" })
}
