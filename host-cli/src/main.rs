use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use firmware::ui::Complexity;
use shared::error::SharedError;

mod application;
mod commands;
mod config;
mod simulator;
mod storage;

#[cfg(test)]
mod test_support;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pattern vault host tool")]
pub struct Cli {
    /// Directory holding the device files (vault and salt).
    #[arg(short, long, value_name = "PATH", default_value = ".")]
    dir: PathBuf,

    /// JSON device configuration. Device defaults apply when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the salt file if it is missing or malformed.
    Init,
    /// Unlock the vault and print its records.
    List(ListArgs),
    /// Append one record to the vault.
    Add(AddArgs),
    /// Drive the device state machine with a button script.
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GestureArgs {
    /// Unlock gesture, e.g. `up,down,up,down,up`.
    #[arg(short, long, value_name = "SYMBOLS")]
    gesture: String,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    gesture: GestureArgs,
    /// Print decrypted secrets as well.
    #[arg(long)]
    show_secrets: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[command(flatten)]
    gesture: GestureArgs,
    #[arg(long)]
    site: String,
    #[arg(long)]
    username: String,
    /// Secret to store.
    #[arg(long, conflicts_with = "generate", required_unless_present = "generate")]
    secret: Option<String>,
    /// Generate a secret of this length instead.
    #[arg(long, value_name = "LENGTH")]
    generate: Option<usize>,
    #[arg(long, value_enum, default_value_t = ComplexityArg::High)]
    complexity: ComplexityArg,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Button script file, or `-` for standard input.
    #[arg(short, long, value_name = "FILE")]
    script: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ComplexityArg {
    Low,
    Medium,
    High,
}

impl From<ComplexityArg> for Complexity {
    fn from(value: ComplexityArg) -> Self {
        match value {
            ComplexityArg::Low => Complexity::Low,
            ComplexityArg::Medium => Complexity::Medium,
            ComplexityArg::High => Complexity::High,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    if let Err(err) = application::execute(cli, &mut stdout.lock()) {
        match &err {
            SharedError::Config(_) => eprintln!("Configuration rejected: {err}"),
            SharedError::Gesture(_) => eprintln!("Gesture not understood: {err}"),
            SharedError::Storage(_) => eprintln!("Storage failure: {err}"),
            SharedError::Vault(_) => eprintln!("Vault operation failed: {err}"),
            SharedError::Input(_) => eprintln!("Invalid input: {err}"),
        }
        return Err(anyhow::Error::from(err));
    }

    Ok(())
}
