//! WebSocket chat server.
//!
//! Accepts connections, gives each its own session and task, and feeds
//! its frames to a [`ChatHandler`]. See [`protocol`] for the wire format.

mod connection;
pub mod protocol;
mod ws_transport;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, ToSocketAddrs};
use tokio_tungstenite::accept_async;

use crate::handler::ChatHandler;

use self::connection::handle_connection;

pub struct ChatServer {
    listener: TcpListener,
}

impl ChatServer {
    pub async fn bind(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever.
    pub async fn serve<H: ChatHandler>(self, handler: Arc<H>) {
        self.serve_until(handler, std::future::pending()).await;
    }

    /// Accept connections until `shutdown` resolves. Connections already
    /// open keep running on their own tasks.
    pub async fn serve_until<H: ChatHandler>(
        self,
        handler: Arc<H>,
        shutdown: impl Future<Output = ()>,
    ) {
        if let Ok(addr) = self.listener.local_addr() {
            tracing::info!(%addr, "Chat server listening");
        }
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Chat server shutting down");
                    return;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        let handler = Arc::clone(&handler);
                        tokio::spawn(async move {
                            match accept_async(stream).await {
                                Ok(ws) => handle_connection(ws, addr, handler).await,
                                Err(e) => {
                                    tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                                }
                            }
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "TCP accept error");
                    }
                }
            }
        }
    }
}
