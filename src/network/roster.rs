use std::collections::HashMap;
use std::str::FromStr;

use chrono::Utc;
use libp2p::PeerId;
use uuid::Uuid;

use crate::common::{ChatMessage, ConnectionStatus, TransportEvent, User};

use super::frame::WireFrame;

/// Kết quả xử lý một gói tin đến.
#[derive(Debug, Default, PartialEq)]
pub struct Inbound {
    pub events: Vec<TransportEvent>,
    /// Peer mới xuất hiện: nên announce lại ngay.
    pub greet: bool,
}

/// Ai đang online (PeerId -> username) và mình là ai.
///
/// Không đụng tới swarm: chỉ biến lệnh thành gói tin và gói tin thành sự kiện.
pub struct Roster {
    local_peer_id: PeerId,
    username: Option<String>,
    peers: HashMap<PeerId, String>,
}

impl Roster {
    pub fn new(local_peer_id: PeerId) -> Self {
        Self {
            local_peer_id,
            username: None,
            peers: HashMap::new(),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn connect(&mut self, username: String) -> Vec<TransportEvent> {
        self.username = Some(username);
        let mut events = vec![TransportEvent::StatusChanged(ConnectionStatus::Connected)];
        events.extend(self.snapshot());
        events
    }

    /// Returns the `Leave` frame to publish (if we were connected) and the status event.
    pub fn disconnect(&mut self) -> (Option<WireFrame>, TransportEvent) {
        let leave = self
            .username
            .take()
            .map(|username| WireFrame::Leave { username });
        (
            leave,
            TransportEvent::StatusChanged(ConnectionStatus::Disconnected),
        )
    }

    pub fn announce_frame(&self) -> Option<WireFrame> {
        self.username.clone().map(|username| WireFrame::Announce { username })
    }

    pub fn typing_frame(&self, is_typing: bool) -> Option<WireFrame> {
        self.username.clone().map(|username| WireFrame::Typing {
            username,
            is_typing,
        })
    }

    /// Frame to publish plus the local echo.
    pub fn compose_global(&self, text: String) -> Option<(WireFrame, TransportEvent)> {
        let username = self.username.clone()?;
        let id = Uuid::new_v4();
        let timestamp = Utc::now();
        let echo = ChatMessage::global(username.clone(), text.clone())
            .with_id(id)
            .with_timestamp(timestamp);
        let frame = WireFrame::Chat {
            id,
            username,
            message: text,
            timestamp,
        };
        Some((frame, TransportEvent::MessageReceived(echo)))
    }

    pub fn compose_private(
        &self,
        recipient_id: String,
        text: String,
    ) -> Option<(WireFrame, TransportEvent)> {
        let username = self.username.clone()?;
        let recipient = PeerId::from_str(&recipient_id)
            .ok()
            .and_then(|peer| self.peers.get(&peer).cloned())
            .unwrap_or_else(|| recipient_id.clone());
        let id = Uuid::new_v4();
        let timestamp = Utc::now();
        let echo = ChatMessage::private(username.clone(), recipient, text.clone())
            .with_id(id)
            .with_timestamp(timestamp);
        let frame = WireFrame::Private {
            id,
            username,
            to_id: recipient_id,
            message: text,
            timestamp,
        };
        Some((frame, TransportEvent::MessageReceived(echo)))
    }

    pub fn on_frame(&mut self, source: PeerId, frame: WireFrame) -> Inbound {
        let mut inbound = Inbound::default();
        match frame {
            WireFrame::Announce { username } => {
                let previous = self.peers.insert(source, username.clone());
                if previous.as_deref() == Some(username.as_str()) {
                    return inbound;
                }
                if previous.is_none() {
                    inbound.greet = true;
                    self.push_if_connected(
                        &mut inbound.events,
                        TransportEvent::SystemAnnouncement(format!("{username} joined the chat")),
                    );
                }
                inbound.events.extend(self.snapshot());
            }
            WireFrame::Leave { .. } => {
                inbound.events = self.forget(source);
            }
            WireFrame::Chat {
                id,
                username,
                message,
                timestamp,
            } => {
                let msg = ChatMessage::global(username, message)
                    .with_id(id)
                    .with_timestamp(timestamp);
                self.push_if_connected(&mut inbound.events, TransportEvent::MessageReceived(msg));
            }
            WireFrame::Private {
                id,
                username,
                to_id,
                message,
                timestamp,
            } => {
                if to_id != self.local_peer_id.to_string() {
                    return inbound;
                }
                if let Some(me) = self.username.clone() {
                    let msg = ChatMessage::private(username, me, message)
                        .with_id(id)
                        .with_timestamp(timestamp);
                    inbound.events.push(TransportEvent::MessageReceived(msg));
                }
            }
            WireFrame::Typing {
                username,
                is_typing,
            } => {
                self.push_if_connected(
                    &mut inbound.events,
                    TransportEvent::TypingChanged {
                        username,
                        is_typing,
                    },
                );
            }
        }
        inbound
    }

    pub fn forget(&mut self, peer_id: PeerId) -> Vec<TransportEvent> {
        let mut events = Vec::new();
        if let Some(username) = self.peers.remove(&peer_id) {
            log::info!("{username} ({peer_id}) left");
            self.push_if_connected(
                &mut events,
                TransportEvent::SystemAnnouncement(format!("{username} left the chat")),
            );
            events.extend(self.snapshot());
        }
        events
    }

    /// Full presence list, local user first, others by name.
    pub fn snapshot(&self) -> Option<TransportEvent> {
        let me = self.username.as_ref()?;
        let mut others: Vec<User> = self
            .peers
            .iter()
            .map(|(peer_id, username)| User::new(peer_id.to_string(), username.clone()))
            .collect();
        others.sort_by(|a, b| a.username.cmp(&b.username));

        let mut users = vec![User::new(self.local_peer_id.to_string(), me.clone())];
        users.extend(others);
        Some(TransportEvent::PresenceSnapshot(users))
    }

    fn push_if_connected(&self, events: &mut Vec<TransportEvent>, event: TransportEvent) {
        if self.username.is_some() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn announce(name: &str) -> WireFrame {
        WireFrame::Announce {
            username: name.to_string(),
        }
    }

    fn connected_bob() -> (Roster, PeerId) {
        let local = PeerId::random();
        let mut roster = Roster::new(local);
        roster.connect("bob".to_string());
        (roster, local)
    }

    fn names(event: &TransportEvent) -> Vec<String> {
        match event {
            TransportEvent::PresenceSnapshot(users) => {
                users.iter().map(|u| u.username.clone()).collect()
            }
            other => panic!("expected presence snapshot, got {other:?}"),
        }
    }

    #[test]
    fn connect_reports_status_then_snapshot_with_self() {
        let local = PeerId::random();
        let mut roster = Roster::new(local);
        let events = roster.connect("bob".to_string());

        assert_eq!(
            events[0],
            TransportEvent::StatusChanged(ConnectionStatus::Connected)
        );
        assert_eq!(
            events[1],
            TransportEvent::PresenceSnapshot(vec![User::new(local.to_string(), "bob")])
        );
    }

    #[test]
    fn disconnect_publishes_leave_once() {
        let (mut roster, _) = connected_bob();
        let (leave, status) = roster.disconnect();
        assert_eq!(
            leave,
            Some(WireFrame::Leave {
                username: "bob".to_string()
            })
        );
        assert_eq!(
            status,
            TransportEvent::StatusChanged(ConnectionStatus::Disconnected)
        );

        let (again, _) = roster.disconnect();
        assert_eq!(again, None);
        assert_eq!(roster.announce_frame(), None);
    }

    #[test]
    fn first_announce_joins_and_greets() {
        let (mut roster, _) = connected_bob();
        let alice = PeerId::random();
        let inbound = roster.on_frame(alice, announce("alice"));

        assert!(inbound.greet);
        assert_eq!(
            inbound.events[0],
            TransportEvent::SystemAnnouncement("alice joined the chat".to_string())
        );
        assert_eq!(names(&inbound.events[1]), vec!["bob", "alice"]);

        let repeat = roster.on_frame(alice, announce("alice"));
        assert_eq!(repeat, Inbound::default());
    }

    #[test]
    fn rename_refreshes_presence_without_join_message() {
        let (mut roster, _) = connected_bob();
        let alice = PeerId::random();
        roster.on_frame(alice, announce("alice"));
        let inbound = roster.on_frame(alice, announce("alicia"));

        assert!(!inbound.greet);
        assert_eq!(inbound.events.len(), 1);
        assert_eq!(names(&inbound.events[0]), vec!["bob", "alicia"]);
    }

    #[test]
    fn leave_announces_and_drops_from_presence() {
        let (mut roster, _) = connected_bob();
        let alice = PeerId::random();
        roster.on_frame(alice, announce("alice"));
        let inbound = roster.on_frame(
            alice,
            WireFrame::Leave {
                username: "alice".to_string(),
            },
        );

        assert_eq!(
            inbound.events[0],
            TransportEvent::SystemAnnouncement("alice left the chat".to_string())
        );
        assert_eq!(names(&inbound.events[1]), vec!["bob"]);
        assert!(roster.forget(alice).is_empty());
    }

    #[test]
    fn private_frame_is_only_for_its_recipient() {
        let (mut roster, local) = connected_bob();
        let private = |to_id: String| WireFrame::Private {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            to_id,
            message: "psst".to_string(),
            timestamp: Utc::now(),
        };

        let other = roster.on_frame(PeerId::random(), private(PeerId::random().to_string()));
        assert!(other.events.is_empty());

        let mine = roster.on_frame(PeerId::random(), private(local.to_string()));
        match &mine.events[..] {
            [TransportEvent::MessageReceived(msg)] => {
                assert!(msg.is_private);
                assert_eq!(msg.sender, "alice");
                assert_eq!(msg.to.as_deref(), Some("bob"));
            }
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn private_echo_resolves_recipient_name() {
        let (mut roster, _) = connected_bob();
        let alice = PeerId::random();
        roster.on_frame(alice, announce("alice"));

        let (frame, echo) = roster
            .compose_private(alice.to_string(), "yo".to_string())
            .unwrap();
        match frame {
            WireFrame::Private { to_id, .. } => assert_eq!(to_id, alice.to_string()),
            other => panic!("unexpected frame {other:?}"),
        }
        match echo {
            TransportEvent::MessageReceived(msg) => {
                assert_eq!(msg.sender, "bob");
                assert_eq!(msg.to.as_deref(), Some("alice"));
                assert!(msg.id.is_some());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn private_echo_falls_back_to_id() {
        let (roster, _) = connected_bob();
        let (_, echo) = roster
            .compose_private("unknown-peer".to_string(), "yo".to_string())
            .unwrap();
        match echo {
            TransportEvent::MessageReceived(msg) => {
                assert_eq!(msg.to.as_deref(), Some("unknown-peer"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn global_echo_shares_id_with_frame() {
        let (roster, _) = connected_bob();
        let (frame, echo) = roster.compose_global("hi".to_string()).unwrap();
        let (WireFrame::Chat { id, .. }, TransportEvent::MessageReceived(msg)) = (frame, echo) else {
            panic!("unexpected global send shape");
        };
        assert_eq!(msg.id, Some(id));
        assert!(!msg.is_private);
    }

    #[test]
    fn nothing_is_composed_or_reported_while_disconnected() {
        let mut roster = Roster::new(PeerId::random());
        assert!(roster.compose_global("hi".to_string()).is_none());
        assert!(roster.typing_frame(true).is_none());
        assert!(roster.snapshot().is_none());

        let inbound = roster.on_frame(PeerId::random(), announce("alice"));
        assert!(inbound.events.is_empty());
        let typing = roster.on_frame(
            PeerId::random(),
            WireFrame::Typing {
                username: "alice".to_string(),
                is_typing: true,
            },
        );
        assert!(typing.events.is_empty());
    }

    #[test]
    fn peers_seen_while_disconnected_appear_after_connect() {
        let local = PeerId::random();
        let mut roster = Roster::new(local);
        roster.on_frame(PeerId::random(), announce("alice"));
        let events = roster.connect("bob".to_string());
        assert_eq!(names(&events[1]), vec!["bob", "alice"]);
    }
}
