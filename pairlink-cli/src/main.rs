use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use pairlink_client::{
    ConnectionSession, LogRenderTarget, MediaBinding, MediaDevices, MediaStatus, NoDevices,
    SessionConfig, SessionError, SessionStatus, SyntheticDevices, TransportConfig,
    WebRtcConnector, WsSignalingChannel,
};
use pairlink_core::{IceServerConfig, RoomId};
use pairlink_server::ServerConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pairlink")]
#[command(about = "Two-party video call signaling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the rendezvous server.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: SocketAddr,
    },
    /// Join a room and negotiate a call with whoever else is in it.
    Join {
        #[arg(long, default_value = "ws://127.0.0.1:8080/ws")]
        server: String,

        /// Prompted for when absent.
        #[arg(short, long)]
        room: Option<String>,

        /// Negotiate without local tracks.
        #[arg(long)]
        no_media: bool,

        /// STUN server URL; may be repeated.
        #[arg(long = "stun")]
        stun: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve { bind } => serve(bind).await,
        Commands::Join {
            server,
            room,
            no_media,
            stun,
        } => join(server, room, no_media, stun).await,
    }
}

async fn serve(bind: SocketAddr) -> Result<()> {
    println!("{}", "🚀 Starting pairlink rendezvous server...".green().bold());

    let config = ServerConfig { bind };
    pairlink_server::serve(&config, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Ctrl-C received, shutting down");
    })
    .await
}

async fn join(server: String, room: Option<String>, no_media: bool, stun: Vec<String>) -> Result<()> {
    let room = match room {
        Some(room) => room,
        None => Input::<String>::new()
            .with_prompt("Room")
            .interact_text()
            .context("Failed to read room name")?,
    };
    let room = RoomId::new(room).map_err(SessionError::from)?;

    let transport = if stun.is_empty() {
        TransportConfig::default()
    } else {
        TransportConfig {
            ice_servers: stun.into_iter().map(IceServerConfig::stun).collect(),
        }
    };
    let config = SessionConfig {
        transport,
        ..SessionConfig::default()
    };
    let devices: Arc<dyn MediaDevices> = if no_media {
        Arc::new(NoDevices)
    } else {
        Arc::new(SyntheticDevices::default())
    };

    println!("{} {}", "📡 Connecting to".cyan(), server);
    let signaling = WsSignalingChannel::connect(&server)
        .await
        .with_context(|| format!("Could not reach {server}"))?;

    let session = ConnectionSession::join(
        room.clone(),
        Arc::new(signaling),
        &WebRtcConnector,
        MediaBinding::new(devices, Arc::new(LogRenderTarget)),
        config,
    )
    .await?;
    println!("{} {}", "🚪 Joining room".cyan(), room.as_str().bold());

    let mut status_rx = session.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "👋 Leaving...".yellow());
                session.leave().await;
                break;
            }
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = status_rx.borrow_and_update().clone();
                print_status(&status);
                if status.is_closed() {
                    break;
                }
            }
        }
    }

    let status = session.status();
    if let Some(failure) = status.failure {
        println!("{} {}", "✖ Session ended:".red().bold(), failure);
    } else {
        println!("{}", "✨ Call ended".green());
    }
    Ok(())
}

fn print_status(status: &SessionStatus) {
    let role = status
        .role
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_owned());
    let media = match &status.media {
        MediaStatus::Pending => "pending".dimmed(),
        MediaStatus::Ready { tracks } => format!("{tracks} track(s)").as_str().normal(),
        MediaStatus::Unavailable(e) => e.to_string().as_str().yellow(),
    };

    let state = format!("{:?}", status.negotiation);
    let state = if status.is_connected() {
        state.as_str().green().bold()
    } else if status.is_closed() {
        state.as_str().red()
    } else {
        state.as_str().cyan()
    };

    println!("   {} {}  role: {}  media: {}", "•".dimmed(), state, role, media);
}
