use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lkit_units::Unit;

#[derive(Parser)]
#[command(
    name = "lkit",
    about = "LedgerKit: exact unit conversion and payload encoding for ledger tests",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Harness config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a display amount to base units
    ToBase(ToBaseArgs),
    /// Convert a base-unit amount to display units
    FromBase(FromBaseArgs),
    /// Hex-encode text as UTF-16 groups
    Encode(EncodeArgs),
    /// Decode a UTF-16 hex payload
    Decode(DecodeArgs),
    /// Show the resolved harness configuration
    Config(ConfigArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ScaleArgs {
    /// Named unit of the display amount
    #[arg(long, conflicts_with = "scale")]
    pub unit: Option<Unit>,
    /// Explicit number of base-unit digits
    #[arg(long)]
    pub scale: Option<u32>,
}

impl ScaleArgs {
    pub fn resolve(&self) -> u32 {
        self.scale
            .unwrap_or_else(|| self.unit.unwrap_or_default().scale())
    }
}

#[derive(Args)]
pub struct ToBaseArgs {
    pub amount: String,
    #[command(flatten)]
    pub denomination: ScaleArgs,
    /// Reject amounts with more fractional digits than the scale
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct FromBaseArgs {
    pub amount: String,
    #[command(flatten)]
    pub denomination: ScaleArgs,
}

#[derive(Args)]
pub struct EncodeArgs {
    pub text: String,
}

#[derive(Args)]
pub struct DecodeArgs {
    pub payload: String,
    /// Ignore a trailing partial group and replace malformed groups
    #[arg(long)]
    pub lenient: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Show a single network entry
    #[arg(long)]
    pub network: Option<String>,
}
