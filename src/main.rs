use clap::Parser;
use dotenvy::dotenv;
use facehome_chat::config::{self, AppConfig};
use facehome_chat::network::ChatTransport;
use facehome_chat::ui::ChatApp;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "facehome_chat", version, about = "Realtime LAN chat client")]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Pre-fill the login field
    #[arg(long, value_name = "NAME")]
    username: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);

    run_client(app_config, cli.username).await
}

async fn run_client(app_config: AppConfig, username: Option<String>) -> Result<(), eframe::Error> {
    // 1. Tạo các kênh giao tiếp (Channels)
    // UI -> Network
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Network -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    // 2. Khởi chạy Network Thread (Chạy ngầm)
    let network_settings = app_config.network.clone();
    tokio::spawn(async move {
        let transport = ChatTransport::new(event_tx, cmd_rx, network_settings);
        if let Err(err) = transport.run().await {
            log::error!("Network transport terminated: {err}");
        }
    });

    // 3. Khởi chạy UI (Chạy trên Main Thread)
    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let session_settings = app_config.session.clone();

    eframe::run_native(
        "FaceHome",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("ChatApp should only be initialized once");

            log::info!("Client started, topic {}", app_config.network.topic);

            Ok(Box::new(ChatApp::new(
                cc,
                session_settings.clone(),
                cmd_tx.clone(),
                event_receiver,
                username.clone(),
            )))
        }),
    )
}
