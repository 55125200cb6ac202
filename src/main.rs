use portal_api::config;
use portal_api::database;
use portal_api::handlers::AppState;
use portal_api::routes;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting portal API in {:?} mode", config.environment);

    let pool = database::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect {}: {}", config.database.url, e));
    database::migrate(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to run migrations: {}", e));
    let state = AppState::new(pool);

    let app = routes::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("portal API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
