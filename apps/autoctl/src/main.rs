use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    controller_url, ClientConfig, ControlRequest, Direction, LoggingTransport, Outcome,
    ProtocolRevision, Transport, TransportEvent, VehicleClient, WsTransport,
    DEFAULT_CONTROLLER_PORT,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Remote control for the Auto vehicle")]
struct Cli {
    /// Controller host; empty means localhost.
    #[arg(long, default_value = "")]
    host: String,
    #[arg(long, default_value_t = DEFAULT_CONTROLLER_PORT)]
    port: u16,
    /// Named wire-code revision, overrides the config file.
    #[arg(long)]
    protocol: Option<ProtocolRevision>,
    /// TOML file with `max_label_length`, `deadband` and a `[protocol]` table.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log frames instead of connecting.
    #[arg(long)]
    dry_run: bool,
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    Move {
        direction: Direction,
    },
    Vector {
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
    },
    Stop,
    Word {
        word: String,
    },
    AutoWord,
    Display {
        state: Switch,
    },
    /// Read commands from stdin, one per line.
    Drive,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Switch {
    On,
    Off,
    Toggle,
}

impl Action {
    fn into_request(self) -> Option<ControlRequest> {
        let request = match self {
            Action::Move { direction } => ControlRequest::Move { direction },
            Action::Vector { x, y } => ControlRequest::Vector { x, y },
            Action::Stop => ControlRequest::Stop,
            Action::Word { word } => ControlRequest::ShowWord { word },
            Action::AutoWord => ControlRequest::AutoWord,
            Action::Display { state: Switch::On } => ControlRequest::Display { on: true },
            Action::Display { state: Switch::Off } => ControlRequest::Display { on: false },
            Action::Display {
                state: Switch::Toggle,
            } => ControlRequest::ToggleDisplay,
            Action::Drive => return None,
        };
        Some(request)
    }
}

#[derive(Debug, PartialEq)]
enum Line {
    Blank,
    Status,
    Quit,
    Request(ControlRequest),
}

fn parse_line(line: &str) -> Result<Line> {
    let line = line.trim();
    match line {
        "" => Ok(Line::Blank),
        "status" => Ok(Line::Status),
        "quit" | "exit" => Ok(Line::Quit),
        json if json.starts_with('{') => serde_json::from_str(json)
            .map(Line::Request)
            .context("invalid JSON request"),
        text => Ok(Line::Request(text.parse()?)),
    }
}

fn load_config(path: Option<&Path>, protocol: Option<ProtocolRevision>) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => ClientConfig::default(),
    };
    if let Some(revision) = protocol {
        config.protocol = revision.table();
    }
    config.validate().context("invalid client configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.protocol)?;

    if cli.dry_run {
        let mut client = VehicleClient::with_config(LoggingTransport, config)?;
        return run(&mut client, cli.action).await;
    }

    let url = controller_url(&cli.host, cli.port)?;
    let transport = WsTransport::connect(url).await?;
    let mut events = transport.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                TransportEvent::Error(message) => warn!(%message, "controller connection error"),
                TransportEvent::Closed => warn!("controller closed the connection"),
            }
        }
    });

    let mut client = VehicleClient::with_config(transport, config)?;
    let result = run(&mut client, cli.action).await;
    client.into_transport().shutdown().await;
    result
}

async fn run<T: Transport>(client: &mut VehicleClient<T>, action: Action) -> Result<()> {
    match action.into_request() {
        Some(request) => {
            let outcome = request.apply(client)?;
            report(&request, outcome);
            Ok(())
        }
        None => drive(client).await,
    }
}

async fn drive<T: Transport>(client: &mut VehicleClient<T>) -> Result<()> {
    info!("reading commands from stdin; 'status' shows the session, 'quit' exits");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Line::Blank) => {}
            Ok(Line::Status) => print_status(client),
            Ok(Line::Quit) => break,
            Ok(Line::Request(request)) => match request.apply(client) {
                Ok(outcome) => report(&request, outcome),
                Err(err) => eprintln!("{err}"),
            },
            Err(err) => eprintln!("{err:#}"),
        }
    }
    Ok(())
}

fn report(request: &ControlRequest, outcome: Outcome) {
    match outcome {
        Outcome::Sent => println!("sent {request:?}"),
        Outcome::Suppressed => println!("skipped {request:?}: inside deadband"),
    }
}

fn print_status<T: Transport>(client: &VehicleClient<T>) {
    let position = client.last_position();
    println!(
        "display={} auto_word={} last_position=({}, {}) max_label_length={}",
        if client.display_on() { "on" } else { "off" },
        client.auto_word_mode(),
        position.x,
        position.y,
        client.max_label_length()
    );
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
