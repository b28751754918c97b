use thiserror::Error;
use tokio::sync::mpsc;

/// Lệnh UI gửi xuống tầng mạng.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    Connect {
        username: String,
    },
    Disconnect,
    SendGlobal(String),
    /// Tin nhắn riêng
    /// - recipient_id: id do tầng mạng cấp cho người nhận
    SendPrivate {
        recipient_id: String,
        text: String,
    },
    Typing(bool),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("command channel is full")]
    Full,
    #[error("command channel is closed")]
    Closed,
}

/// Nơi nhận lệnh gửi đi. Gửi kiểu fire-and-forget, không chờ phản hồi.
pub trait CommandSink {
    fn dispatch(&self, command: TransportCommand) -> Result<(), SinkError>;
}

impl CommandSink for mpsc::Sender<TransportCommand> {
    fn dispatch(&self, command: TransportCommand) -> Result<(), SinkError> {
        self.try_send(command).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => SinkError::Full,
            mpsc::error::TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}
