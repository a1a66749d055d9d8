use axum::{middleware::from_fn, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use milo_api_rust::database::DatabaseManager;
use milo_api_rust::handlers;
use milo_api_rust::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, MILO_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = milo_api_rust::config::config();
    tracing::info!("Starting Milo API in {:?} mode", config.environment);

    tracing_subscriber::fmt::init();

    // Pools are created lazily; a database that is still coming up
    // surfaces as a degraded /health rather than a dead process
    if let Err(e) = DatabaseManager::migrate().await {
        tracing::warn!("database migration failed at startup: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("MILO_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Milo API Rust server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Resource routes behind the JWT gate
        .merge(task_routes().layer(from_fn(jwt_auth_middleware)))
        .merge(goal_routes().layer(from_fn(jwt_auth_middleware)))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn task_routes() -> Router {
    use axum::routing::{post, put};
    use handlers::tasks;

    Router::new()
        .route("/tasks", get(tasks::list))
        .route("/tasks/addtask", post(tasks::create))
        .route("/tasks/:id", put(tasks::update).delete(tasks::delete))
        .route("/tasks/month/:month", get(tasks::list_by_month))
        .route("/tasks/complete/:id", put(tasks::toggle_completion))
}

fn goal_routes() -> Router {
    use axum::routing::{post, put};
    use handlers::goals;

    Router::new()
        .route("/goals", get(goals::list))
        .route("/goals/addgoal", post(goals::create))
        .route("/goals/:id", put(goals::update).delete(goals::delete))
        .route("/goals/progress/:id", put(goals::set_progress))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Milo API (Rust)",
        "version": version,
        "description": "Personal productivity backend built with Rust (Axum)",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "tasks": "/tasks, /tasks/addtask, /tasks/:id, /tasks/month/:yyyy-mm, /tasks/complete/:id (bearer token)",
            "goals": "/goals, /goals/addgoal, /goals/:id, /goals/progress/:id (bearer token)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "message": "database unavailable"
                })),
            )
        }
    }
}
