//! Dựng swarm libp2p cho chat: TCP/DNS + noise + yamux, gossipsub + mDNS.

use std::collections::hash_map::DefaultHasher;
use std::error::Error;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::time::Duration;

use libp2p::core::muxing::StreamMuxerBox;
use libp2p::core::transport::Boxed;
use libp2p::core::upgrade::Version;
use libp2p::gossipsub::{self, IdentTopic};
use libp2p::mdns;
use libp2p::swarm::{Config as SwarmConfig, NetworkBehaviour};
use libp2p::{Multiaddr, PeerId, Swarm, Transport, dns, identity, noise, tcp, yamux};

use crate::config::NetworkSettings;

#[derive(NetworkBehaviour)]
pub struct ChatBehavior {
    pub gossipsub: gossipsub::Behaviour,
    pub mdns: mdns::tokio::Behaviour,
}

/// Id của một gói gossipsub: (nguồn, số thứ tự) của mỗi lần publish.
///
/// Typing/Announce/Leave frames repeat byte-for-byte, so the payload alone
/// cannot identify a publish. Unsigned messages fall back to the payload hash.
pub fn frame_message_id(message: &gossipsub::Message) -> gossipsub::MessageId {
    match (message.source, message.sequence_number) {
        (Some(source), Some(seq)) => gossipsub::MessageId::from(format!("{source}/{seq}")),
        _ => {
            let mut hasher = DefaultHasher::new();
            message.data.hash(&mut hasher);
            gossipsub::MessageId::from(hasher.finish().to_string())
        }
    }
}

fn build_behavior(
    local_key: &identity::Keypair,
    local_peer_id: PeerId,
    topic_name: &str,
) -> Result<(ChatBehavior, IdentTopic), Box<dyn Error>> {
    let gossipsub_config = gossipsub::ConfigBuilder::default()
        .heartbeat_interval(Duration::from_secs(1))
        .duplicate_cache_time(Duration::from_secs(30))
        .validation_mode(gossipsub::ValidationMode::Strict)
        .message_id_fn(frame_message_id)
        .build()?;

    let mut gossipsub = gossipsub::Behaviour::new(
        gossipsub::MessageAuthenticity::Signed(local_key.clone()),
        gossipsub_config,
    )?;

    let topic = gossipsub::IdentTopic::new(topic_name);
    gossipsub.subscribe(&topic)?;

    let mdns = mdns::tokio::Behaviour::new(mdns::Config::default(), local_peer_id)?;

    Ok((ChatBehavior { gossipsub, mdns }, topic))
}

fn build_transport(
    local_key: &identity::Keypair,
) -> Result<Boxed<(PeerId, StreamMuxerBox)>, Box<dyn Error>> {
    let tcp_transport = tcp::tokio::Transport::new(tcp::Config::default().nodelay(true));

    Ok(dns::tokio::Transport::system(tcp_transport)?
        .upgrade(Version::V1)
        .authenticate(noise::Config::new(local_key)?)
        .multiplex(yamux::Config::default())
        .boxed())
}

/// Swarm đã subscribe topic chat và đang lắng nghe trên `listen_addr`.
pub fn build_swarm(
    local_key: &identity::Keypair,
    settings: &NetworkSettings,
) -> Result<(Swarm<ChatBehavior>, IdentTopic), Box<dyn Error>> {
    let local_peer_id = PeerId::from(local_key.public());
    let transport = build_transport(local_key)?;
    let (behavior, topic) = build_behavior(local_key, local_peer_id, &settings.topic)?;

    let mut swarm = Swarm::new(
        transport,
        behavior,
        local_peer_id,
        SwarmConfig::with_tokio_executor(),
    );
    swarm.listen_on(Multiaddr::from_str(&settings.listen_addr)?)?;

    Ok((swarm, topic))
}
