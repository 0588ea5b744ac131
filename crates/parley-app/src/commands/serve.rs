//! `parley serve`: WebSocket chat server.

use std::sync::Arc;

use parley_chat::{ChatServer, ConversationRelay};
use parley_common::ParleyError;
use parley_config::ParleyConfig;

use super::{build_client, runtime};

pub fn serve(config: ParleyConfig) -> Result<(), ParleyError> {
    let relay = Arc::new(ConversationRelay::new(build_client(&config)?, &config));
    let addr = format!("{}:{}", config.chat.bind, config.chat.port);

    runtime()?.block_on(async move {
        let server = ChatServer::bind(&addr).await?;
        let local = server.local_addr()?;
        tracing::info!(%local, mode = %relay.mode(), "parley serve ready");
        println!("Listening on ws://{local}");

        server
            .serve_until(relay, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "Failed to listen for ctrl-c");
                    std::future::pending::<()>().await;
                }
            })
            .await;
        Ok::<_, ParleyError>(())
    })
}
