pub mod controller;
pub mod message_log;
pub mod notify;
pub mod presence;
pub mod router;
pub mod state;
pub mod typing;

pub use controller::SessionController;
pub use notify::{Notifier, NotifyError, TerminalBell};
pub use state::{Effect, Input, Intent, SessionState, SessionView};
pub use typing::TypingScope;
