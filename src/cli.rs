use crate::chrome::{self, USER_CHROME};
use crate::host;
use crate::profile::{self, MatchPolicy};
use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "userchrome",
    version,
    about = "Locate the default Firefox profile and make sure userChrome.css exists"
)]
pub struct Cli {
    /// Log level: error, warn, info, debug
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create <profile>/chrome/userChrome.css if it is missing
    Ensure(EnsureArgs),
    /// Print the resolved profile directory without writing anything
    Locate(ScanArgs),
    /// Print the detected host facts
    Host {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Profile root to scan instead of the platform default
    #[arg(long)]
    pub base_dir: Option<PathBuf>,
    /// Fail when any directory under the profile root is not a default profile
    #[arg(long)]
    pub strict: bool,
}

impl ScanArgs {
    fn policy(&self) -> MatchPolicy {
        if self.strict {
            MatchPolicy::Strict
        } else {
            MatchPolicy::Lenient
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct EnsureArgs {
    #[command(flatten)]
    pub scan: ScanArgs,
    /// Stylesheet to create inside the chrome directory
    #[arg(long, default_value = USER_CHROME)]
    pub file: String,
}

fn init_logger(level_arg: &str) {
    let mut builder = env_logger::Builder::new();
    builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    builder.parse_filters(level_arg);
    let _ = builder.try_init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli.log_level);
    match cli.command {
        Some(Commands::Ensure(args)) => chrome::run(
            args.scan.base_dir.as_deref(),
            args.scan.policy(),
            &args.file,
        )?,
        Some(Commands::Locate(args)) => profile::run(args.base_dir.as_deref(), args.policy())?,
        Some(Commands::Host { json }) => host::run(json)?,
        None => {
            return Err(anyhow!(
                "no command provided. Use the ensure, locate or host subcommands."
            ))
        }
    }
    Ok(())
}
