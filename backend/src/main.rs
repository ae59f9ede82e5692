use backend::{relay::Relay, rooms::RoomRegistry};

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenv::dotenv().ok();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    tokio::spawn(Relay::new(RoomRegistry::new()).run(events_rx));

    let app = backend::api::router(events_tx);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("[RELAY] Listening on {addr}");

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind server port");
    axum::serve(listener, app).await.expect("Server error");
}
