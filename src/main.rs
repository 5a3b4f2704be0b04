use std::time::Duration;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use squarepool::{
    core::DEFAULT_GAME_ID,
    routes::{actions, health},
    state::AppState,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing; set RUST_LOG to override
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "squarepool=info,tower_http=warn".into()),
        )
        .init();

    println!("🏈 Squarepool board server starting...");

    let game_id = std::env::var("GAME_ID").unwrap_or_else(|_| DEFAULT_GAME_ID.to_string());
    let state = AppState::new(game_id.clone());
    println!("🔗 Serving board '{}'", game_id);

    // The board page is served from any origin; clients poll with plain
    // JSON POSTs, so no credentialed CORS is needed
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/game", post(actions::game_action))
        .fallback_service(ServeDir::new("public"))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(10)))
                .layer(cors),
        );

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = format!("0.0.0.0:{}", port);

    println!("🚀 Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    println!("✅ Server listening on http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
