use std::net::SocketAddr;

use removals_server::geocode::{GeocodeConfig, PostcodeClient};
use removals_server::ledger::OrderLedger;
use removals_server::web::{AppState, create_router};

/// Default path for the durable order store.
const DEFAULT_ORDERS_FILE: &str = "orders.csv";

/// Default directory for the booking form's static assets.
const DEFAULT_STATIC_DIR: &str = "public";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let orders_file =
        std::env::var("ORDERS_FILE").unwrap_or_else(|_| DEFAULT_ORDERS_FILE.to_string());
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());

    // Create geocoding client
    let mut geocode_config = GeocodeConfig::default();
    if let Ok(base_url) = std::env::var("POSTCODES_BASE_URL") {
        geocode_config = geocode_config.with_base_url(base_url);
    }
    let geocoder = PostcodeClient::new(geocode_config).expect("Failed to create geocoding client");

    // Open the ledger before binding. A recovery failure means the id
    // counter is ambiguous, so we refuse to start.
    let ledger = OrderLedger::open(&orders_file)
        .unwrap_or_else(|e| panic!("Failed to open order ledger at {orders_file}: {e}"));
    println!(
        "Order ledger at {} (last order id: {})",
        orders_file,
        ledger.last_id().await
    );

    // Build app state
    let state = AppState::new(geocoder, ledger);

    // Create router
    let app = create_router(state, &static_dir);

    // Bind and serve
    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .expect("BIND_ADDR must be a socket address");
    println!("Removals server listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health             - Health check");
    println!("  POST /calculate-price    - Quote a route between two postcodes");
    println!("  POST /submit-booking     - Confirm a booking");
    println!("  GET  /validate-postcode  - Live postcode existence check");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
