use std::sync::Arc;

use cashcard_api::auth::UserDirectory;
use cashcard_api::config;
use cashcard_api::state::AppState;
use cashcard_api::store::{CashCardStore, InMemoryCashCardStore, PgCashCardStore};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL and friends
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();

    let users = UserDirectory::builtin_users(config.security.bcrypt_cost)
        .unwrap_or_else(|e| panic!("failed to build user directory: {}", e));

    let store: Arc<dyn CashCardStore> = match &config.database.url {
        Some(url) => {
            tracing::info!("Using the Postgres cash card store");
            let store = PgCashCardStore::connect(url, config.database.max_connections)
                .await
                .unwrap_or_else(|e| panic!("failed to connect to Postgres: {}", e));
            Arc::new(store)
        }
        None => {
            tracing::info!("DATABASE_URL not set, using the in-memory cash card store");
            Arc::new(InMemoryCashCardStore::new())
        }
    };

    let app = cashcard_api::app(AppState::new(store, Arc::new(users)));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Family Cash Card API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
