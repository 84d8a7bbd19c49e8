use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::gateway::middleware::cors_layer;
use crate::gateway::routes::build_routes;
use crate::gateway::state::AppState;
use crate::modules::storage::KvStore;

pub async fn start(
    host: &str,
    port: u16,
    store: Arc<dyn KvStore>,
) -> Result<(SocketAddr, tokio::task::JoinHandle<()>), String> {
    let state = AppState::new(store);
    let app = build_routes().layer(cors_layer()).with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Address {} binding failed: {}", addr, e))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to read bound address: {}", e))?;

    info!("Subscription gateway started at http://{}", local_addr);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        {
            error!("Gateway server exited with error: {}", e);
        }
    });

    Ok((local_addr, handle))
}
