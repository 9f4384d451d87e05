use clap::{Parser, Subcommand};
use pieview::config;
use pieview::gui::app::AppModel;
use pieview::sys::runtime;
use pieview::sys::server::{ControlCommand, SOCKET_PATH};
use relm4::prelude::*;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pieview", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of the default location
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Select a slice in the running chart
    Select { index: usize },
    /// Deselect a slice in the running chart
    Deselect { index: usize },
    /// Re-read slice values in the running chart
    Reload,
    /// Write the sample config if none exists and print its path
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => config::resolve_config_path(&path)?,
        None => config::get_config_path()?,
    };

    match cli.command {
        Some(Commands::Select { index }) => send_command(ControlCommand::Select(index)),
        Some(Commands::Deselect { index }) => send_command(ControlCommand::Deselect(index)),
        Some(Commands::Reload) => send_command(ControlCommand::Reload),
        Some(Commands::InitConfig) => {
            config::write_default_config(&config_path)?;
            println!("{}", config_path.display());
            Ok(())
        }
        None => run_gui(config_path),
    }
}

fn run_gui(config_path: PathBuf) -> anyhow::Result<()> {
    let config = config::load_or_builtin(&config_path);

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx, config_path.clone())?;

    let app = RelmApp::new("org.pieview.chart");

    app.run::<AppModel>((config, config_path, rx));
    Ok(())
}

fn send_command(command: ControlCommand) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to pieview at {}: {}. Is it running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", command)?;
    Ok(())
}
