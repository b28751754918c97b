use std::error::Error;
use std::time::Duration;

use futures::StreamExt;
use libp2p::gossipsub;
use libp2p::mdns;
use libp2p::swarm::SwarmEvent;
use libp2p::{PeerId, Swarm, identity};
use tokio::sync::mpsc;

use crate::common::{TransportCommand, TransportEvent};
use crate::config::NetworkSettings;

use super::frame::WireFrame;
use super::roster::Roster;
use super::swarm::{ChatBehavior, ChatBehaviorEvent, build_swarm};

/// Vòng lặp mạng: nhận lệnh từ UI, lan truyền qua gossipsub, đẩy sự kiện lên UI.
pub struct ChatTransport {
    event_sender: mpsc::Sender<TransportEvent>,
    command_receiver: mpsc::Receiver<TransportCommand>,
    settings: NetworkSettings,
}

impl ChatTransport {
    pub fn new(
        event_sender: mpsc::Sender<TransportEvent>,
        command_receiver: mpsc::Receiver<TransportCommand>,
        settings: NetworkSettings,
    ) -> Self {
        Self {
            event_sender,
            command_receiver,
            settings,
        }
    }

    pub async fn run(mut self) -> Result<(), Box<dyn Error>> {
        let local_key = identity::Keypair::generate_ed25519();
        let local_peer_id = PeerId::from(local_key.public());
        log::info!("Local PeerID: {local_peer_id:?}");

        let (mut swarm, topic) = build_swarm(&local_key, &self.settings)?;
        let mut roster = Roster::new(local_peer_id);

        let period = Duration::from_secs(self.settings.announce_interval_secs.max(1));
        let mut announce_timer = tokio::time::interval(period);
        log::info!("Network event loop started");

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => {
                            self.handle_command(command, &mut roster, &mut swarm, &topic).await;
                        }
                        None => break,
                    }
                }
                event = swarm.select_next_some() => {
                    self.handle_swarm_event(event, &mut roster, &mut swarm, &topic).await;
                }
                _ = announce_timer.tick() => {
                    publish(&mut swarm, &topic, roster.announce_frame());
                }
            }
        }

        log::info!("Command channel closed; network loop stopping");
        Ok(())
    }

    async fn handle_command(
        &self,
        command: TransportCommand,
        roster: &mut Roster,
        swarm: &mut Swarm<ChatBehavior>,
        topic: &gossipsub::IdentTopic,
    ) {
        match command {
            TransportCommand::Connect { username } => {
                log::info!("Joining chat as {username}");
                let events = roster.connect(username);
                publish(swarm, topic, roster.announce_frame());
                self.send_events(events).await;
            }
            TransportCommand::Disconnect => {
                let (leave, status) = roster.disconnect();
                publish(swarm, topic, leave);
                self.send_events(vec![status]).await;
            }
            TransportCommand::SendGlobal(text) => match roster.compose_global(text) {
                Some((frame, echo)) => {
                    publish(swarm, topic, Some(frame));
                    self.send_events(vec![echo]).await;
                }
                None => log::warn!("Not connected; ignoring global message"),
            },
            TransportCommand::SendPrivate { recipient_id, text } => {
                match roster.compose_private(recipient_id, text) {
                    Some((frame, echo)) => {
                        publish(swarm, topic, Some(frame));
                        self.send_events(vec![echo]).await;
                    }
                    None => log::warn!("Not connected; ignoring private message"),
                }
            }
            TransportCommand::Typing(is_typing) => {
                publish(swarm, topic, roster.typing_frame(is_typing));
            }
        }
    }

    async fn handle_swarm_event(
        &self,
        event: SwarmEvent<ChatBehaviorEvent>,
        roster: &mut Roster,
        swarm: &mut Swarm<ChatBehavior>,
        topic: &gossipsub::IdentTopic,
    ) {
        match event {
            SwarmEvent::Behaviour(ChatBehaviorEvent::Gossipsub(gossipsub::Event::Message {
                propagation_source,
                message,
                ..
            })) => {
                let source = message.source.unwrap_or(propagation_source);
                match WireFrame::decode(&message.data) {
                    Ok(frame) => {
                        let inbound = roster.on_frame(source, frame);
                        if inbound.greet {
                            // Chào lại ngay để peer mới không phải chờ tới lượt announce kế tiếp.
                            publish(swarm, topic, roster.announce_frame());
                        }
                        self.send_events(inbound.events).await;
                    }
                    Err(err) => log::warn!("Dropping malformed frame from {source}: {err}"),
                }
            }
            SwarmEvent::Behaviour(ChatBehaviorEvent::Gossipsub(
                gossipsub::Event::Unsubscribed { peer_id, .. },
            )) => {
                self.send_events(roster.forget(peer_id)).await;
            }
            SwarmEvent::Behaviour(ChatBehaviorEvent::Mdns(mdns::Event::Discovered(list))) => {
                for (peer_id, _) in list {
                    log::info!("Discovered peer {peer_id}");
                    swarm.behaviour_mut().gossipsub.add_explicit_peer(&peer_id);
                }
            }
            SwarmEvent::Behaviour(ChatBehaviorEvent::Mdns(mdns::Event::Expired(list))) => {
                for (peer_id, _) in list {
                    log::info!("Peer {peer_id} expired");
                    swarm
                        .behaviour_mut()
                        .gossipsub
                        .remove_explicit_peer(&peer_id);
                    self.send_events(roster.forget(peer_id)).await;
                }
            }
            SwarmEvent::ConnectionClosed {
                peer_id,
                num_established: 0,
                ..
            } => {
                self.send_events(roster.forget(peer_id)).await;
            }
            SwarmEvent::NewListenAddr { address, .. } => {
                log::info!("Listening on {address:?}");
            }
            _ => {}
        }
    }

    async fn send_events(&self, events: Vec<TransportEvent>) {
        for event in events {
            if let Err(err) = self.event_sender.send(event).await {
                log::warn!("Failed to notify UI: {err:?}");
            }
        }
    }
}

fn publish(
    swarm: &mut Swarm<ChatBehavior>,
    topic: &gossipsub::IdentTopic,
    frame: Option<WireFrame>,
) {
    let Some(frame) = frame else {
        return;
    };
    match frame.encode() {
        Ok(bytes) => {
            if let Err(err) = swarm
                .behaviour_mut()
                .gossipsub
                .publish(topic.clone(), bytes)
            {
                log::warn!("Publish error: {err:?}");
            }
        }
        Err(err) => {
            log::warn!("Failed to serialize frame: {err:?}");
        }
    }
}
