//! Chat front-end for Parley.
//!
//! A [`ChatHandler`] reacts to session start and user messages and talks
//! back through a [`ChatTransport`]. [`ConversationRelay`] is the handler
//! that forwards each message to the agent runner and relays the reply;
//! [`ChatServer`] hosts any handler over WebSocket.

pub mod handler;
pub mod relay;
pub mod server;
pub mod session;
pub mod transport;

pub use handler::ChatHandler;
pub use relay::{ConversationRelay, THINKING_PLACEHOLDER};
pub use server::ChatServer;
pub use session::ChatSession;
pub use transport::{ChatTransport, MessageId, TransportError};
