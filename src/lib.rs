//! Client chat realtime: phòng chung + chat riêng, hiện ai đang online và ai đang gõ.
//!
//! - `session`: lõi trạng thái (presence, typing, log tin nhắn, bộ lọc cuộc trò chuyện, thông báo)
//! - `network`: tầng mạng libp2p (gossipsub + mDNS)
//! - `ui`: giao diện egui

pub mod common;
pub mod config;
pub mod network;
pub mod session;
pub mod ui;
