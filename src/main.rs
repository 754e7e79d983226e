#![forbid(unsafe_code)]

//! `mission-board`: warehouse transport mission board.
//!
//! Manages operator panels and the missions they exchange, renders a
//! panel's board, and runs the auto-advance loop that moves accepted
//! missions through `In queue`, `Active`, and `Completed`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use mission_board::config::GlobalConfig;
use mission_board::lifecycle::{MissionService, PanelRegistry};
use mission_board::models::{Area, MissionType, PanelConfig};
use mission_board::orchestrator::advance_consumer::spawn_advance_consumer;
use mission_board::orchestrator::advance_timer::AdvanceTimers;
use mission_board::orchestrator::store_watcher::spawn_store_watcher;
use mission_board::persistence::mission_repo::MissionRepo;
use mission_board::persistence::panel_repo::PanelRepo;
use mission_board::persistence::{db, MissionStore, PanelStore};
use mission_board::projection::board::{self, BoardTab};
use mission_board::projection::PanelMission;
use mission_board::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Direction {
    Send,
    Receive,
}

impl From<Direction> for MissionType {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Send => Self::Send,
            Direction::Receive => Self::Receive,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Tab {
    Pending,
    Active,
    Completed,
}

impl From<Tab> for BoardTab {
    fn from(tab: Tab) -> Self {
        match tab {
            Tab::Pending => Self::Pending,
            Tab::Active => Self::Active,
            Tab::Completed => Self::Completed,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "mission-board", about = "Warehouse transport mission board", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage operator panels.
    #[command(subcommand)]
    Panel(PanelCommand),
    /// Create, accept, and cancel missions.
    #[command(subcommand)]
    Mission(MissionCommand),
    /// Show the missions a panel sees.
    Board {
        /// Panel whose board to show.
        panel: String,
        /// Only show one status tab.
        #[arg(long, value_enum)]
        tab: Option<Tab>,
        /// Print the projection as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run the auto-advance loop until interrupted.
    Watch,
}

#[derive(Debug, Args)]
struct PanelAreas {
    /// Panel identifier.
    user_id: String,
    /// Origin areas the panel operates from.
    #[arg(long, value_delimiter = ',', value_parser = parse_area)]
    areas: Vec<Area>,
    /// Areas the panel may send to.
    #[arg(long, value_delimiter = ',', value_parser = parse_area)]
    send_to: Vec<Area>,
    /// Areas the panel may receive from.
    #[arg(long, value_delimiter = ',', value_parser = parse_area)]
    receive_from: Vec<Area>,
}

impl PanelAreas {
    fn into_config(self) -> PanelConfig {
        PanelConfig::new(self.user_id, self.areas, self.send_to, self.receive_from)
    }
}

#[derive(Debug, Subcommand)]
enum PanelCommand {
    /// Register a new panel.
    Add(PanelAreas),
    /// Replace an existing panel's areas.
    Edit(PanelAreas),
    /// Delete a panel.
    Remove {
        /// Panel identifier.
        user_id: String,
    },
    /// List registered panels.
    List {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum MissionCommand {
    /// Create a pending mission.
    Create {
        /// Creating panel.
        #[arg(long)]
        panel: String,
        /// Direction from the creator's point of view.
        #[arg(long = "type", value_enum)]
        mission_type: Direction,
        /// Creator origin area the mission starts or ends at.
        #[arg(long, value_parser = parse_area)]
        origin: Area,
        /// Kind of goods.
        #[arg(long)]
        cargo: Option<String>,
        /// Number of pieces.
        #[arg(long)]
        pieces: Option<u32>,
    },
    /// Cancel a mission.
    Cancel {
        /// Mission id.
        id: i64,
        /// Requesting panel.
        #[arg(long)]
        panel: String,
    },
    /// Accept a mission as its sending side.
    Send {
        /// Mission id.
        id: i64,
        /// Accepting panel.
        #[arg(long)]
        panel: String,
        /// Accepting panel's pickup area.
        #[arg(long, value_parser = parse_area)]
        area: Area,
    },
    /// Accept a mission as its receiving side.
    Receive {
        /// Mission id.
        id: i64,
        /// Accepting panel.
        #[arg(long)]
        panel: String,
        /// Accepting panel's drop-off area.
        #[arg(long, value_parser = parse_area)]
        area: Area,
    },
    /// Print every stored mission record.
    List,
    /// Delete records without a creator panel.
    Purge,
    /// Delete every mission.
    Reset,
}

fn parse_area(raw: &str) -> std::result::Result<Area, String> {
    Area::parse(raw).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let config = GlobalConfig::load_from_path(&args.config)?;
    let database = Arc::new(db::connect(&config.db_path).await?);
    info!(db_path = %config.db_path.display(), "database connected");

    let missions: Arc<dyn MissionStore> = Arc::new(MissionRepo::new(Arc::clone(&database)));
    let panels: Arc<dyn PanelStore> = Arc::new(PanelRepo::new(database));
    let service = MissionService::new(
        missions,
        Arc::clone(&panels),
        config.cargo_catalog()?,
        config.robot_pool(),
    );
    let registry = PanelRegistry::new(panels);

    match args.command {
        Command::Panel(command) => run_panel(&registry, command).await,
        Command::Mission(command) => run_mission(&service, command).await,
        Command::Board { panel, tab, json } => {
            let projected = service.project_for_panel(&panel).await?;
            if json {
                match tab {
                    Some(tab) => print_json(&board::filter_tab(&projected, tab.into())),
                    None => print_json(&projected),
                }
            } else {
                print_board(&service, &panel, &projected, tab.map(BoardTab::from));
                Ok(())
            }
        }
        Command::Watch => watch(&config, service).await,
    }
}

async fn run_panel(registry: &PanelRegistry, command: PanelCommand) -> Result<()> {
    match command {
        PanelCommand::Add(areas) => {
            let panel = registry.register(areas.into_config()).await?;
            println!("registered panel {}", panel.user_id);
        }
        PanelCommand::Edit(areas) => {
            let panel = registry.update(areas.into_config()).await?;
            println!("updated panel {}", panel.user_id);
        }
        PanelCommand::Remove { user_id } => {
            registry.remove(&user_id).await?;
            println!("removed panel {user_id}");
        }
        PanelCommand::List { json } => {
            let panels = registry.list().await?;
            if json {
                return print_json(&panels);
            }
            for panel in &panels {
                println!(
                    "{}  areas: {}  send to: {}  receive from: {}",
                    panel.user_id,
                    join_areas(&panel.selected_areas),
                    join_areas(&panel.send_to_locations),
                    join_areas(&panel.receive_from_locations),
                );
            }
        }
    }
    Ok(())
}

async fn run_mission(service: &MissionService, command: MissionCommand) -> Result<()> {
    match command {
        MissionCommand::Create {
            panel,
            mission_type,
            origin,
            cargo,
            pieces,
        } => {
            let mission = service
                .create_mission(&panel, mission_type.into(), cargo, pieces, &origin)
                .await?;
            println!("created mission {}", mission.id);
        }
        MissionCommand::Cancel { id, panel } => {
            service.cancel_mission(id, &panel).await?;
            println!("cancelled mission {id}");
        }
        MissionCommand::Send { id, panel, area } => {
            let mission = service.accept_as_send(id, &panel, &area).await?;
            println!(
                "mission {id} queued for {}",
                mission.robot_name.as_deref().unwrap_or_default()
            );
        }
        MissionCommand::Receive { id, panel, area } => {
            let mission = service.accept_as_receive(id, &panel, &area).await?;
            println!(
                "mission {id} queued for {}",
                mission.robot_name.as_deref().unwrap_or_default()
            );
        }
        MissionCommand::List => print_json(&service.records().await?)?,
        MissionCommand::Purge => {
            let purged = service.purge_invalid().await?;
            println!("purged {purged} invalid mission(s)");
        }
        MissionCommand::Reset => {
            let deleted = service.reset().await?;
            println!("deleted {deleted} mission(s)");
        }
    }
    Ok(())
}

fn print_board(
    service: &MissionService,
    panel_id: &str,
    projected: &[PanelMission],
    only: Option<BoardTab>,
) {
    let catalog = service.catalog();
    let tabs = only.map_or_else(
        || vec![BoardTab::Pending, BoardTab::Active, BoardTab::Completed],
        |tab| vec![tab],
    );

    for tab in tabs {
        let items = board::filter_tab(projected, tab);
        println!("== {} ({}) ==", tab.title(), items.len());
        for item in items {
            let mission = &item.mission;
            let route = board::displayed_route(item);
            let endpoint = |area: Option<&Area>| {
                area.map_or_else(|| "?".to_owned(), |a| catalog.display_name(a).to_owned())
            };
            let actions: Vec<String> = board::available_actions(item, panel_id)
                .iter()
                .map(|action| format!("{action:?}").to_lowercase())
                .collect();
            println!(
                "#{:<5} {:<10} {:<8} {} -> {}  cargo: {}  pieces: {}  robot: {}  [{}]",
                mission.id,
                board::status_label(mission.status()),
                item.display_type.as_str(),
                endpoint(route.from.as_ref()),
                endpoint(route.to.as_ref()),
                mission.cargo_type.as_deref().unwrap_or("-"),
                mission
                    .number_of_pieces
                    .map_or_else(|| "-".to_owned(), |n| n.to_string()),
                mission.robot_name.as_deref().unwrap_or("-"),
                actions.join(", "),
            );
        }
    }
}

async fn watch(config: &GlobalConfig, service: MissionService) -> Result<()> {
    let ct = CancellationToken::new();
    let (tx, rx) = mpsc::channel(64);
    let timers = AdvanceTimers::new(&config.timers, tx, ct.clone());

    let consumer = spawn_advance_consumer(rx, service.clone(), timers.clone(), ct.clone());
    let watcher = spawn_store_watcher(service, timers, config.timers.poll_interval(), ct.clone());
    info!("auto-advance loop running");

    shutdown_signal().await;
    info!("shutdown signal received");
    ct.cancel();

    let _ = tokio::join!(consumer, watcher);
    info!("mission-board shut down");
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn join_areas(areas: &[Area]) -> String {
    areas
        .iter()
        .map(Area::code)
        .collect::<Vec<_>>()
        .join(",")
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter).with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
