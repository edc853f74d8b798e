//! swarmchoreo main entry point.
//!
//! Runs a drone-swarm choreography headless against the built-in arena:
//! - **bevy_ecs** schedules spawning, snapshot capture, the choreography tick
//!   and state-intent application
//! - **configparser** reads the session settings from `config.ini`
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --choreography bird_flap
//! cargo run --release -- --list
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use swarmchoreo::choreos;
use swarmchoreo::game;
use swarmchoreo::resources::gameconfig::ChoreoConfig;

/// Drone swarm choreography runner
#[derive(Parser)]
#[command(version, about = "Runs drone-swarm choreographies headless.")]
struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Choreography to run, overriding the configuration file.
    #[arg(long, value_name = "NAME")]
    choreography: Option<String>,

    /// Stop after this many simulated seconds, overriding the configuration file.
    #[arg(long, value_name = "S")]
    max_seconds: Option<f32>,

    /// Print the registered choreographies and exit.
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.list {
        for name in choreos::NAMES {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    let mut config = ChoreoConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    if let Some(name) = cli.choreography {
        config.choreography = name;
    }
    if let Some(secs) = cli.max_seconds {
        config.max_seconds = secs;
    }

    match game::run_headless(&config) {
        Ok(summary) if summary.error.is_none() => {
            println!(
                "{}: {} after {} ticks ({:.2}s)",
                summary.choreography,
                if summary.finished { "finished" } else { "stopped" },
                summary.ticks,
                summary.elapsed
            );
            ExitCode::SUCCESS
        }
        Ok(summary) => {
            eprintln!(
                "{}: failed at {:.2}s: {}",
                summary.choreography,
                summary.elapsed,
                summary.error.unwrap_or_default()
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
