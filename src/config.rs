use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::session::TypingScope;

pub const DEFAULT_CONFIG_PATH: &str = "config/facehome.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub network: NetworkSettings,
}

/// Cấu hình cho phần lõi phiên chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub typing_scope: TypingScope,
    /// Bỏ tin nhắn trùng id (tầng mạng gửi lại).
    pub dedup_by_id: bool,
    pub notifications: bool,
    pub max_username_len: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            typing_scope: TypingScope::Global,
            dedup_by_id: true,
            notifications: true,
            max_username_len: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub topic: String,
    pub listen_addr: String,
    pub announce_interval_secs: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            topic: "facehome-global".to_string(),
            listen_addr: "/ip4/0.0.0.0/tcp/0".to_string(),
            announce_interval_secs: 5,
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}
