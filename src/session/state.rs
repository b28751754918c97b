//! Trạng thái phiên chat và hàm chuyển trạng thái duy nhất (`apply`).
//!
//! Mọi sự kiện từ mạng và mọi thao tác người dùng đi qua `SessionState::apply`,
//! trả về danh sách hiệu ứng (gửi lệnh, phát cảnh báo) để controller thực thi.
//! UI chỉ đọc `SessionView`, một bản chụp bất biến.

use crate::common::{ChatMessage, ConnectionStatus, TransportCommand, TransportEvent, User};
use crate::config::SessionSettings;

use super::message_log::MessageLog;
use super::notify::NotificationTrigger;
use super::presence::PresenceRegistry;
use super::router::{filtered_view, route_outbound};
use super::typing::{TypingAggregator, typing_phrase};

/// Thao tác của người dùng.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Connect(String),
    Disconnect,
    Select(Option<User>),
    SendText(String),
    SetTyping(bool),
    EditDraft(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Inbound(TransportEvent),
    Intent(Intent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Emit(TransportCommand),
    Alert(ChatMessage),
}

pub struct SessionState {
    settings: SessionSettings,
    trigger: NotificationTrigger,
    status: ConnectionStatus,
    username: Option<String>,
    presence: PresenceRegistry,
    typing: TypingAggregator,
    log: MessageLog,
    selected: Option<User>,
    draft: String,
}

impl SessionState {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            trigger: NotificationTrigger::new(settings.notifications),
            status: ConnectionStatus::Disconnected,
            username: None,
            presence: PresenceRegistry::new(),
            typing: TypingAggregator::new(),
            log: MessageLog::new(settings.dedup_by_id),
            selected: None,
            draft: String::new(),
            settings,
        }
    }

    pub fn apply(&mut self, input: Input) -> Vec<Effect> {
        match input {
            Input::Inbound(event) => self.on_event(event),
            Input::Intent(intent) => self.on_intent(intent),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn selected(&self) -> Option<&User> {
        self.selected.as_ref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    pub fn typing(&self) -> &TypingAggregator {
        &self.typing
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn view(&self) -> SessionView {
        let local = self.username.as_deref().unwrap_or_default();
        let selected = self.selected.as_ref();
        let typing_users = self.typing.visible(self.settings.typing_scope, selected);

        SessionView {
            status: self.status,
            username: self.username.clone(),
            selected: self.selected.clone(),
            header: match selected {
                Some(peer) => format!("Private with {}", peer.username),
                None => "Global Room".to_string(),
            },
            messages: filtered_view(self.log.all(), selected, local)
                .into_iter()
                .cloned()
                .collect(),
            users: self.presence.list().to_vec(),
            user_count: self.presence.count(),
            typing_phrase: typing_phrase(&typing_users),
            typing_users,
            draft: self.draft.clone(),
        }
    }

    /// Discards everything owned by the session.
    fn reset(&mut self) {
        self.status = ConnectionStatus::Disconnected;
        self.username = None;
        self.presence = PresenceRegistry::new();
        self.typing = TypingAggregator::new();
        self.log = MessageLog::new(self.settings.dedup_by_id);
        self.selected = None;
        self.draft.clear();
    }

    fn on_intent(&mut self, intent: Intent) -> Vec<Effect> {
        if let Intent::Connect(username) = &intent {
            return self.connect(username);
        }
        if !self.status.is_connected() {
            log::debug!("Ignoring {intent:?} while disconnected");
            return Vec::new();
        }

        match intent {
            Intent::Connect(_) => Vec::new(),
            Intent::Disconnect => {
                self.reset();
                vec![Effect::Emit(TransportCommand::Disconnect)]
            }
            Intent::Select(None) => {
                self.selected = None;
                Vec::new()
            }
            Intent::Select(Some(user)) => {
                if !self.presence.contains_id(&user.id) {
                    log::debug!("Ignoring selection of absent user {}", user.username);
                } else if self.username.as_deref() == Some(user.username.as_str()) {
                    log::debug!("Ignoring selection of the local user");
                } else {
                    self.selected = Some(user);
                }
                Vec::new()
            }
            Intent::SendText(text) => match route_outbound(&text, self.selected.as_ref()) {
                Some(command) => {
                    self.draft.clear();
                    vec![
                        Effect::Emit(command),
                        Effect::Emit(TransportCommand::Typing(false)),
                    ]
                }
                None => {
                    log::debug!("Ignoring blank outbound message");
                    Vec::new()
                }
            },
            Intent::SetTyping(is_typing) => {
                vec![Effect::Emit(TransportCommand::Typing(is_typing))]
            }
            Intent::EditDraft(text) => {
                let is_typing = !text.is_empty();
                self.draft = text;
                vec![Effect::Emit(TransportCommand::Typing(is_typing))]
            }
        }
    }

    fn connect(&mut self, username: &str) -> Vec<Effect> {
        if self.status.is_connected() {
            log::debug!("Already connected; ignoring connect");
            return Vec::new();
        }
        let username = username.trim();
        if username.is_empty() || username.chars().count() > self.settings.max_username_len {
            log::debug!("Rejecting username {username:?}");
            return Vec::new();
        }

        self.reset();
        self.username = Some(username.to_string());
        self.status = ConnectionStatus::Connected;
        log::info!("Session started as {username}");
        vec![Effect::Emit(TransportCommand::Connect {
            username: username.to_string(),
        })]
    }

    fn on_event(&mut self, event: TransportEvent) -> Vec<Effect> {
        if !self.status.is_connected() {
            log::debug!("Ignoring inbound event while disconnected: {event:?}");
            return Vec::new();
        }

        match event {
            TransportEvent::MessageReceived(message) => self.record(message),
            TransportEvent::SystemAnnouncement(text) => self.record(ChatMessage::system(text)),
            TransportEvent::PresenceSnapshot(users) => {
                self.typing.retain_present(&users);
                self.presence.apply_snapshot(users);
                Vec::new()
            }
            TransportEvent::TypingChanged {
                username,
                is_typing,
            } => {
                if self.username.as_deref() != Some(username.as_str()) {
                    self.typing.set_typing(&username, is_typing);
                }
                Vec::new()
            }
            TransportEvent::StatusChanged(ConnectionStatus::Disconnected) => {
                log::info!("Transport disconnected; discarding session state");
                self.reset();
                Vec::new()
            }
            TransportEvent::StatusChanged(ConnectionStatus::Connected) => Vec::new(),
        }
    }

    fn record(&mut self, message: ChatMessage) -> Vec<Effect> {
        let local = self.username.as_deref().unwrap_or_default();
        match self.log.append(message) {
            Some(appended) if self.trigger.should_fire(appended, local) => {
                vec![Effect::Alert(appended.clone())]
            }
            _ => Vec::new(),
        }
    }
}

/// Bản chụp bất biến để UI render.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub status: ConnectionStatus,
    pub username: Option<String>,
    pub selected: Option<User>,
    pub header: String,
    pub messages: Vec<ChatMessage>,
    pub users: Vec<User>,
    pub user_count: usize,
    pub typing_users: Vec<String>,
    pub typing_phrase: Option<String>,
    pub draft: String,
}

impl SessionView {
    /// Người dùng khác (không gồm bản thân), cho sidebar.
    pub fn peers(&self) -> impl Iterator<Item = &User> {
        let local = self.username.as_deref();
        self.users
            .iter()
            .filter(move |user| Some(user.username.as_str()) != local)
    }

    pub fn is_selected(&self, user: &User) -> bool {
        self.selected.as_ref().is_some_and(|peer| peer.id == user.id)
    }

    pub fn is_own(&self, message: &ChatMessage) -> bool {
        self.username.as_deref() == Some(message.sender.as_str())
    }

    pub fn input_hint(&self) -> String {
        match &self.selected {
            Some(peer) => format!("Message {}...", peer.username),
            None => "Message everyone...".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected(name: &str) -> SessionState {
        let mut state = SessionState::new(SessionSettings::default());
        state.apply(Input::Intent(Intent::Connect(name.to_string())));
        state
    }

    fn inbound(state: &mut SessionState, event: TransportEvent) -> Vec<Effect> {
        state.apply(Input::Inbound(event))
    }

    #[test]
    fn connect_trims_and_emits() {
        let mut state = SessionState::new(SessionSettings::default());
        let effects = state.apply(Input::Intent(Intent::Connect("  bob ".to_string())));
        assert_eq!(
            effects,
            vec![Effect::Emit(TransportCommand::Connect {
                username: "bob".to_string()
            })]
        );
        assert_eq!(state.username(), Some("bob"));
        assert!(state.status().is_connected());
    }

    #[test]
    fn connect_rejects_blank_and_overlong_names() {
        let mut state = SessionState::new(SessionSettings::default());
        assert!(state.apply(Input::Intent(Intent::Connect("   ".to_string()))).is_empty());
        assert!(state
            .apply(Input::Intent(Intent::Connect("x".repeat(16))))
            .is_empty());
        assert!(!state.status().is_connected());
    }

    #[test]
    fn connect_twice_is_noop() {
        let mut state = connected("bob");
        assert!(state.apply(Input::Intent(Intent::Connect("eve".to_string()))).is_empty());
        assert_eq!(state.username(), Some("bob"));
    }

    #[test]
    fn inbound_events_are_dropped_while_disconnected() {
        let mut state = SessionState::new(SessionSettings::default());
        inbound(
            &mut state,
            TransportEvent::MessageReceived(ChatMessage::global("alice", "hi")),
        );
        assert!(state.log().is_empty());
    }

    #[test]
    fn own_typing_signal_is_not_shown() {
        let mut state = connected("bob");
        inbound(
            &mut state,
            TransportEvent::TypingChanged {
                username: "bob".to_string(),
                is_typing: true,
            },
        );
        assert!(state.typing().list().is_empty());
    }

    #[test]
    fn presence_snapshot_prunes_typing() {
        let mut state = connected("bob");
        inbound(
            &mut state,
            TransportEvent::TypingChanged {
                username: "alice".to_string(),
                is_typing: true,
            },
        );
        inbound(
            &mut state,
            TransportEvent::PresenceSnapshot(vec![User::new("b", "bob")]),
        );
        assert!(state.view().typing_users.is_empty());
    }

    #[test]
    fn system_announcement_lands_in_global_room() {
        let mut state = connected("bob");
        let effects = inbound(
            &mut state,
            TransportEvent::SystemAnnouncement("alice joined the chat".to_string()),
        );
        assert_eq!(effects.len(), 1);
        let view = state.view();
        assert_eq!(view.messages.len(), 1);
        assert!(view.messages[0].system);
    }

    #[test]
    fn transport_drop_discards_state() {
        let mut state = connected("bob");
        inbound(
            &mut state,
            TransportEvent::MessageReceived(ChatMessage::global("alice", "hi")),
        );
        inbound(
            &mut state,
            TransportEvent::StatusChanged(ConnectionStatus::Disconnected),
        );
        assert!(!state.status().is_connected());
        assert!(state.log().is_empty());
        assert_eq!(state.username(), None);
    }

    #[test]
    fn selection_of_self_or_absent_user_is_ignored() {
        let mut state = connected("bob");
        inbound(
            &mut state,
            TransportEvent::PresenceSnapshot(vec![User::new("b", "bob"), User::new("a", "alice")]),
        );
        state.apply(Input::Intent(Intent::Select(Some(User::new("b", "bob")))));
        assert!(state.selected().is_none());
        state.apply(Input::Intent(Intent::Select(Some(User::new("z", "zed")))));
        assert!(state.selected().is_none());
        state.apply(Input::Intent(Intent::Select(Some(User::new("a", "alice")))));
        assert_eq!(state.selected().map(|u| u.username.as_str()), Some("alice"));
    }

    #[test]
    fn stale_selection_survives_departure() {
        let mut state = connected("bob");
        let alice = User::new("a", "alice");
        inbound(
            &mut state,
            TransportEvent::PresenceSnapshot(vec![User::new("b", "bob"), alice.clone()]),
        );
        state.apply(Input::Intent(Intent::Select(Some(alice.clone()))));
        inbound(
            &mut state,
            TransportEvent::MessageReceived(ChatMessage::private("alice", "bob", "bye")),
        );
        inbound(
            &mut state,
            TransportEvent::PresenceSnapshot(vec![User::new("b", "bob")]),
        );

        let view = state.view();
        assert_eq!(view.selected, Some(alice));
        assert_eq!(view.messages.len(), 1);
        assert_eq!(view.peers().count(), 0);
    }

    #[test]
    fn view_reports_header_and_hint() {
        let mut state = connected("bob");
        let alice = User::new("a", "alice");
        inbound(
            &mut state,
            TransportEvent::PresenceSnapshot(vec![User::new("b", "bob"), alice.clone()]),
        );
        let view = state.view();
        assert_eq!(view.header, "Global Room");
        assert_eq!(view.input_hint(), "Message everyone...");
        assert_eq!(view.user_count, 2);

        state.apply(Input::Intent(Intent::Select(Some(alice))));
        let view = state.view();
        assert_eq!(view.header, "Private with alice");
        assert_eq!(view.input_hint(), "Message alice...");
    }

    #[test]
    fn edit_draft_toggles_typing() {
        let mut state = connected("bob");
        assert_eq!(
            state.apply(Input::Intent(Intent::EditDraft("h".to_string()))),
            vec![Effect::Emit(TransportCommand::Typing(true))]
        );
        assert_eq!(state.draft(), "h");
        assert_eq!(
            state.apply(Input::Intent(Intent::EditDraft(String::new()))),
            vec![Effect::Emit(TransportCommand::Typing(false))]
        );
    }

    #[test]
    fn conversation_typing_scope_limits_header() {
        let settings = SessionSettings {
            typing_scope: crate::session::TypingScope::Conversation,
            ..SessionSettings::default()
        };
        let mut state = SessionState::new(settings);
        state.apply(Input::Intent(Intent::Connect("bob".to_string())));
        let alice = User::new("a", "alice");
        inbound(
            &mut state,
            TransportEvent::PresenceSnapshot(vec![
                User::new("b", "bob"),
                alice.clone(),
                User::new("c", "carol"),
            ]),
        );
        inbound(
            &mut state,
            TransportEvent::TypingChanged {
                username: "carol".to_string(),
                is_typing: true,
            },
        );
        assert_eq!(state.view().typing_phrase.as_deref(), Some("carol is typing..."));

        state.apply(Input::Intent(Intent::Select(Some(alice))));
        assert_eq!(state.view().typing_phrase, None);
    }
}
