//! Command-line surface

mod container;

use std::io::Write;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

pub use container::{ExecArgs, RunArgs, StopArgs};

use crate::containers::{get_engine_runtime, EngineName};

#[derive(Parser)]
#[command(
    name = "regtool",
    version,
    about = "Stop, list, run and exec containers by their registered service name"
)]
pub struct Cli {
    /// Container engine to drive
    #[arg(
        long,
        global = true,
        value_enum,
        env = "REGTOOL_ENGINE",
        default_value_t = EngineName::Docker
    )]
    pub engine: EngineName,

    /// Path to the engine CLI binary (defaults to the engine's name on PATH)
    #[arg(long, global = true, env = "REGTOOL_ENGINE_BIN")]
    pub engine_bin: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stop containers registered under a name
    Stop(StopArgs),

    /// List running containers with their registered names
    List,

    /// Create and start a container under a registered name
    Run(RunArgs),

    /// Run a command in the container registered under a name
    Exec(ExecArgs),

    /// Print a shell completion script
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Run the parsed command, writing command output to `out`.
/// Returns the process exit code.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<i32> {
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "regtool", out);
        return Ok(0);
    }

    let engine = get_engine_runtime(cli.engine, cli.engine_bin.as_deref());
    let binary = cli.engine_bin.as_deref().unwrap_or(cli.engine.binary());

    match cli.command {
        Commands::Stop(args) => container::stop(&engine, binary, args),
        Commands::List => container::list(&engine, binary, out),
        Commands::Run(args) => container::run(&engine, binary, args),
        Commands::Exec(args) => container::exec(&engine, binary, args, out),
        Commands::Completions { .. } => Ok(0),
    }
}
