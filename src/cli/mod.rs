use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod runner;

#[derive(Parser)]
#[command(name = "marginminer")]
#[command(version, about = "FII screener with pt-BR formatting and cascading filters")]
#[command(
    long_about = "Load FII indicator exports (one CSV per segment), then narrow them by segment and numeric ranges such as P/VP, dividend yield, cash percentage, price and daily liquidity."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to a TOML config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the data directory (CSV files live in <DIR>/csv/fii)
    #[arg(long = "data-dir", global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter the dataset once and print the table
    Screen(ScreenArgs),

    /// List segments found in the dataset
    Segments,

    /// List sector CSV files
    Sectors,

    /// List tickers of a sector file, or of a segment
    Tickers {
        /// Sector file name (e.g., Logistica.csv)
        file: Option<String>,

        /// Segment to list when no file is given
        #[arg(short, long)]
        segment: Option<String>,
    },

    /// Create the market data cache directories
    Init,

    /// Launch interactive mode
    Interactive,
}

/// Range bounds take pt-BR numbers ("0,94", "R$ 10,00", "8%").
/// Unparsable bounds are ignored.
#[derive(Args, Debug, Default)]
pub struct ScreenArgs {
    /// Segment name ("todos" for every segment)
    #[arg(short, long)]
    pub segment: Option<String>,

    /// Apply a preset before the explicit bounds (papel-anc, papel-cresc, tijolo-anc, tijolo-cresc)
    #[arg(short, long)]
    pub preset: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub pvp_min: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub pvp_max: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub dy_min: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub dy_max: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub cash_min: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub cash_max: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub price_min: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub price_max: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub liq_min: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub liq_max: Option<String>,
}
