use anyhow::Result;
use clap::{Parser, Subcommand};

use stingray_cli::commands;
use stingray_cli::core::runtime::AudioDevice;
use stingray_cli::utils::logging;

#[derive(Parser)]
#[clap(name = "stingray")]
#[clap(about = "Install and run the StingrayTV emulator")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Show debug output
    #[clap(short, long, global = true)]
    verbose: bool,
    /// Only print errors and hide progress bars
    #[clap(short, long, global = true)]
    quiet: bool,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install StingrayTV emulator and apps
    Init,
    /// Run emulator
    #[clap(alias = "r")]
    Run {
        /// The audiocard number to run emulator
        #[clap(long = "acard", alias = "audiocard-number", default_value_t = 1)]
        acard: u32,
        /// The audiodevice number to run emulator
        #[clap(long = "anumber", alias = "audiodevice-number", default_value_t = 0)]
        anumber: u32,
    },
    /// Install app to emulator
    #[clap(alias = "i")]
    Install {
        /// App directory, relative to the current directory (default: current directory)
        dir: Option<String>,
    },
    /// Update emulator or apps
    #[clap(alias = "u")]
    Update {
        /// What to update: emulator or apps
        target: String,
    },
    /// Show installed apps
    #[clap(alias = "l")]
    List,
    /// Delete app by name
    #[clap(alias = "d")]
    Delete {
        /// Name of the app, without the .pkg extension
        app_name: String,
    },
    /// Check the installation and container runtime
    Doctor,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Init => commands::init::init(cli.quiet).map_err(|e| anyhow::anyhow!(e)),
        Commands::Run { acard, anumber } => commands::run::run_emulator(AudioDevice {
            card: acard,
            device: anumber,
        })
        .map_err(|e| anyhow::anyhow!(e)),
        Commands::Install { dir } => {
            commands::install::install_app(dir.as_deref()).map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Update { target } => {
            commands::update::update(&target, cli.quiet).map_err(|e| anyhow::anyhow!(e))
        }
        Commands::List => commands::list::list_apps().map_err(|e| anyhow::anyhow!(e)),
        Commands::Delete { app_name } => {
            commands::delete::delete_app(&app_name).map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Doctor => {
            commands::doctor::check_environment().map_err(|e| anyhow::anyhow!(e))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
