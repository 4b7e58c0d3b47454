mod cli;

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use marginminer::cache::{to_yahoo, CachePaths, SeriesPaths};
use marginminer::config::AppConfig;
use marginminer::dispatcher::{dispatch_command, Flow, Session};
use marginminer::loader::DatasetLoader;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config = AppConfig::load(cli.config.as_deref(), cli.data_dir.as_deref())?;
    info!("Data directory: {}", config.data_dir.display());

    let command = cli.command.unwrap_or(Commands::Interactive);

    if let Some(commands) = cli::runner::to_internal_commands(&command)? {
        let dataset = DatasetLoader::new(&config).load()?;
        let mut session = Session::new(dataset, cli.json);
        for cmd in commands {
            if dispatch_command(&mut session, cmd)? == Flow::Exit {
                break;
            }
        }
        return Ok(());
    }

    match command {
        Commands::Sectors => {
            for name in DatasetLoader::new(&config).list_sector_files()? {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Tickers {
            file: Some(file), ..
        } => {
            let tickers = DatasetLoader::new(&config).load_sector_tickers(&file)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tickers)?);
            } else {
                for ticker in tickers {
                    println!("{}", ticker);
                }
            }
            Ok(())
        }
        Commands::Init => handle_init(&config, cli.json),
        Commands::Interactive => {
            let dataset = DatasetLoader::new(&config).load()?;
            marginminer::ui::launch_tui(Session::new(dataset, cli.json))
        }
        // Everything else was converted above
        Commands::Screen(_) | Commands::Segments | Commands::Tickers { .. } => Ok(()),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_init(config: &AppConfig, json_output: bool) -> Result<()> {
    let cache = CachePaths::from_config(config);
    cache.ensure_dirs()?;

    let loader = DatasetLoader::new(config);
    let tickers = if loader.csv_dir().is_dir() {
        loader.load()?.tickers()
    } else {
        Vec::new()
    };
    let series: Vec<SeriesPaths> = tickers.iter().map(|t| cache.series_for(t)).collect();
    let benchmark = cache.benchmark_path(&config.benchmark);

    if json_output {
        let out = serde_json::json!({
            "cache_dir": cache.root(),
            "benchmark": { "symbol": to_yahoo(&config.benchmark), "path": benchmark },
            "history_years": config.history_years,
            "default_period": config.default_period,
            "trading_days": config.trading_days,
            "risk_free_rate": config.risk_free_rate,
            "series": series,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} Cache ready at {}", "✓".green().bold(), cache.root().display());
    for dir in cache.all_dirs() {
        println!("  {}", dir.display());
    }
    println!(
        "\nHistory: {} years (period {}), {} trading days/year, risk-free rate {}",
        config.history_years, config.default_period, config.trading_days, config.risk_free_rate
    );
    println!(
        "Benchmark: {} -> {}",
        to_yahoo(&config.benchmark).cyan(),
        benchmark.display()
    );

    if series.is_empty() {
        println!(
            "\nPlace sector CSV files in {}",
            config.csv_dir().display().to_string().cyan()
        );
        return Ok(());
    }
    println!("\n{} funds:", series.len());
    for s in &series {
        println!("  {:<8} {:<11} {}", s.ticker, s.symbol, s.prices.display());
    }
    Ok(())
}
