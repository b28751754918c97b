use crate::common::{
    CommandSink, ConnectionStatus, SinkError, TransportCommand, TransportEvent, User,
};
use crate::config::SessionSettings;

use super::notify::{self, Notifier};
use super::state::{Effect, Input, Intent, SessionState, SessionView};

/// Ghép trạng thái phiên với tầng mạng (`sink`) và bộ phát cảnh báo.
///
/// Every intent is synchronous: it runs the reducer, then performs the
/// resulting effects. Transport acknowledgements come back later through
/// [`SessionController::handle_event`].
pub struct SessionController<S, N> {
    state: SessionState,
    sink: S,
    notifier: N,
}

impl<S: CommandSink, N: Notifier> SessionController<S, N> {
    pub fn new(settings: SessionSettings, sink: S, notifier: N) -> Self {
        Self {
            state: SessionState::new(settings),
            sink,
            notifier,
        }
    }

    pub fn connect(&mut self, username: &str) {
        self.dispatch(Input::Intent(Intent::Connect(username.to_string())));
    }

    pub fn disconnect(&mut self) {
        self.dispatch(Input::Intent(Intent::Disconnect));
    }

    pub fn select_conversation(&mut self, user: Option<User>) {
        self.dispatch(Input::Intent(Intent::Select(user)));
    }

    pub fn send_text(&mut self, text: &str) {
        self.dispatch(Input::Intent(Intent::SendText(text.to_string())));
    }

    pub fn set_local_typing(&mut self, is_typing: bool) {
        self.dispatch(Input::Intent(Intent::SetTyping(is_typing)));
    }

    pub fn edit_draft(&mut self, text: String) {
        self.dispatch(Input::Intent(Intent::EditDraft(text)));
    }

    pub fn handle_event(&mut self, event: TransportEvent) {
        self.dispatch(Input::Inbound(event));
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn view(&self) -> SessionView {
        self.state.view()
    }

    fn dispatch(&mut self, input: Input) {
        let effects = self.state.apply(input);
        for effect in effects {
            match effect {
                Effect::Emit(command) => {
                    let is_connect = matches!(command, TransportCommand::Connect { .. });
                    match self.sink.dispatch(command) {
                        Ok(()) => {}
                        Err(SinkError::Full) if !is_connect => {
                            log::warn!("Command channel full; dropping command");
                        }
                        Err(err) => {
                            // Transport không biết username thì phiên không dùng được.
                            log::warn!("Transport unreachable ({err}); ending session");
                            self.state.apply(Input::Inbound(TransportEvent::StatusChanged(
                                ConnectionStatus::Disconnected,
                            )));
                            return;
                        }
                    }
                }
                Effect::Alert(message) => notify::fire(&self.notifier, &message),
            }
        }
    }
}
