use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use matryx_sidebar::{ConsoleNotifier, RoomSessionController, SessionState, SidebarConfig, logging};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file; defaults to <config dir>/matryx-sidebar/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List joined rooms with their names
    Rooms,
    /// Create a private room
    Create {
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Join a room by ID or alias
    Join { room: String },
    /// Invite a user to the current room
    Invite {
        user: String,
        /// Room to invite to instead of the first joined room
        #[arg(short, long)]
        room: Option<String>,
    },
    /// Select a room and show its timeline
    Switch { room: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = SidebarConfig::load(cli.config.as_deref())?;
    let _log_guard = logging::init(&config)?;

    let mut controller = RoomSessionController::from_config(&config, Arc::new(ConsoleNotifier))
        .await
        .context("Failed to set up the Matrix client")?;

    if !controller.state().has_access_token() {
        anyhow::bail!("No access token: set access_token in the config or MATRIX_ACCESS_TOKEN");
    }

    // A session starts by loading the room list, which also selects the first room.
    if let Err(e) = controller.fetch_rooms_with_names().await {
        debug!("Continuing with an empty room list: {}", e);
    }

    let outcome = match cli.command {
        Commands::Rooms => Ok(()),
        Commands::Create { name } => {
            if let Some(name) = name {
                controller.set_new_room_name(name);
            }
            controller.create_room().await.map(|_| ())
        },
        Commands::Join { room } => {
            controller.set_join_room_id(room);
            controller.join_room().await.map(|_| ())
        },
        Commands::Invite { user, room } => {
            if let Some(room) = room {
                controller.switch_room(&room);
            }
            controller.set_invite_user(user);
            controller.invite_user_to_room().await
        },
        Commands::Switch { room } => {
            controller.switch_room(&room);
            Ok(())
        },
    };

    controller.run_follow_ups().await;
    print_summary(&controller);

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            info!("Command failed: {}", e);
            Ok(ExitCode::FAILURE)
        },
    }
}

fn print_summary(controller: &RoomSessionController) {
    let state: &SessionState = controller.state();

    println!("Rooms:");
    for room in &state.rooms {
        let marker = if state.is_current_room(&room.room_id) { '*' } else { ' ' };
        println!(" {} {} ({})", marker, room.name, room.room_id);
    }

    let Some(room_id) = &state.room_id else {
        return;
    };
    println!();
    println!("{}: {} members", controller.get_room_name(room_id), state.members.len());
    for message in &state.messages {
        println!("  <{}> {}", message.sender, message.body);
    }
}
