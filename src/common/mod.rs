pub mod commands;
pub mod events;
pub mod types;

pub use commands::{CommandSink, SinkError, TransportCommand};
pub use events::TransportEvent;
pub use types::{ChatMessage, ConnectionStatus, User};
