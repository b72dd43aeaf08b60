// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, Subcommand, ValueEnum};
use keycloak_local::commands::command::ShowCommand;
use keycloak_local::commands::config::ConfigCommand;
use keycloak_local::commands::fetch::FetchCommand;
use keycloak_local::commands::run::RunCommand;
use keycloak_local::config::new_keycloak_config;
use keycloak_local::error::{Result, format_error_chain, get_exit_code};
use keycloak_local::launch::LaunchMode;
use keycloak_local::logging;

#[derive(Parser)]
#[command(name = "keycloak-local")]
#[command(author, version, about = "Local Keycloak server for integration tests", long_about = None)]
struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and cache a Keycloak distribution
    Fetch {
        /// Release version (e.g., "26.0.7")
        version: String,

        /// Disable progress indicators
        #[arg(long)]
        no_progress: bool,
    },

    /// Print the command line used to launch a cached distribution
    Command {
        /// Release version (e.g., "26.0.7")
        version: String,

        /// Launch mode to render
        #[arg(long, value_enum, default_value_t = ModeArg::Run)]
        mode: ModeArg,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Build, start and probe Keycloak, then keep it running until interrupted
    Run {
        /// Release version (e.g., "26.0.7")
        version: String,

        /// Route server output through the logger instead of stdout
        #[arg(long)]
        log_output: bool,

        /// Disable progress indicators
        #[arg(long)]
        no_progress: bool,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Build,
    Run,
}

impl From<ModeArg> for LaunchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Build => LaunchMode::Build,
            ModeArg::Run => LaunchMode::Run,
        }
    }
}

fn setup_logger(cli: &Cli) {
    logging::setup_logger(cli.verbose);
}

fn main() {
    let cli = Cli::parse();

    setup_logger(&cli);

    let mut config = match new_keycloak_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error_chain(&e));
            std::process::exit(get_exit_code(&e));
        }
    };

    let result: Result<()> = (|| {
        match cli.command {
            Commands::Fetch {
                version,
                no_progress,
            } => {
                config.download.no_progress |= no_progress;
                let command = FetchCommand::new(&config)?;
                command.execute(&version)
            }
            Commands::Command {
                version,
                mode,
                json,
            } => {
                let command = ShowCommand::new(&config)?;
                command.execute(&version, mode.into(), json)
            }
            Commands::Run {
                version,
                log_output,
                no_progress,
            } => {
                config.download.no_progress |= no_progress;
                let command = RunCommand::new(&config)?;
                command.execute(&version, log_output)
            }
            Commands::Config => {
                let command = ConfigCommand::new(&config)?;
                command.execute()
            }
        }
    })();

    if let Err(e) = result {
        eprintln!("{}", format_error_chain(&e));
        std::process::exit(get_exit_code(&e));
    }
}
