mod client;
pub mod frame;
pub mod roster;
mod swarm;

pub use client::ChatTransport;
