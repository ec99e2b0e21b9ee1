//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvLoader;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::memory_adapter::InMemoryDataAdapter;
use crate::domain::backtest::BacktestResult;
use crate::domain::config_validation::{
    build_backtest_config, log_level, BacktestConfig, DEFAULT_LOG_LEVEL, DEFAULT_TICKER,
};
#[cfg(feature = "web")]
use crate::domain::config_validation::validate_serve_config;
use crate::domain::error::QuantsimError;
use crate::domain::registry::StrategyRegistry;
use crate::domain::service::{BacktestRequest, BacktestService};
use crate::logging::init_logging;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "quantsim", about = "Moving-average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// CSV price file, overrides [data] csv_path
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        ticker: Option<String>,
        #[arg(short, long)]
        strategy: Option<String>,
        #[arg(long)]
        capital: Option<Decimal>,
        /// Strategy parameter as key=value, repeatable
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,
    },
    /// Validate a backtest configuration without loading data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List registered strategy identifiers
    Strategies,
    /// Show bar count and date range of a CSV file
    Info {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        ticker: Option<String>,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct BacktestOverrides {
    pub data: Option<PathBuf>,
    pub ticker: Option<String>,
    pub strategy: Option<String>,
    pub capital: Option<Decimal>,
    pub params: Vec<(String, f64)>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            data,
            ticker,
            strategy,
            capital,
            params,
        } => {
            let overrides = BacktestOverrides {
                data,
                ticker,
                strategy,
                capital,
                params,
            };
            run_backtest(&config, &overrides)
        }
        Command::Validate { config } => run_validate(&config),
        Command::Strategies => run_strategies(),
        Command::Info { data, ticker } => run_info(&data, ticker.as_deref()),
        Command::Serve { config } => run_serve(&config),
    }
}

/// Parse a `key=value` strategy parameter.
pub fn parse_param(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    Ok((key.to_string(), value))
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, QuantsimError> {
    FileConfigAdapter::from_file(path).map_err(|e| QuantsimError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Merge CLI overrides into the file config. Returns the request and the CSV path.
pub fn build_request(
    config: &BacktestConfig,
    overrides: &BacktestOverrides,
) -> Result<(BacktestRequest, PathBuf), QuantsimError> {
    let csv_path = overrides
        .data
        .clone()
        .or_else(|| config.csv_path.as_ref().map(PathBuf::from))
        .ok_or_else(|| QuantsimError::ConfigMissing {
            section: "data".into(),
            key: "csv_path".into(),
        })?;

    let mut parameters = config.parameters.clone();
    for (key, value) in &overrides.params {
        parameters.insert(key, *value);
    }

    let request = BacktestRequest {
        ticker: overrides
            .ticker
            .as_deref()
            .map(|t| t.trim().to_uppercase())
            .unwrap_or_else(|| config.ticker.clone()),
        strategy: overrides
            .strategy
            .clone()
            .unwrap_or_else(|| config.strategy.clone()),
        initial_capital: overrides.capital.unwrap_or(config.initial_capital),
        parameters,
    };
    Ok((request, csv_path))
}

/// Load the CSV into a fresh in-memory store and run the request against it.
pub fn execute_backtest(
    request: &BacktestRequest,
    csv_path: &Path,
    registry: &StrategyRegistry,
) -> Result<BacktestResult, QuantsimError> {
    let store = InMemoryDataAdapter::new();
    CsvLoader::new(&request.ticker).load_into(&store, csv_path)?;
    BacktestService::new(&store, registry).run(request)
}

pub fn format_result(result: &BacktestResult) -> String {
    format!(
        "initialCapital: {:.4}\nfinalCapital:   {:.4}\ntotalPnL:       {:.4}\nsharpeRatio:    {:.4}\nmaxDrawdown:    {:.4}",
        result.initial_capital(),
        result.final_capital(),
        result.total_pnl(),
        result.sharpe_ratio(),
        result.max_drawdown(),
    )
}

fn fail(err: &QuantsimError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn run_backtest(config_path: &Path, overrides: &BacktestOverrides) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    init_logging(&log_level(&adapter));

    let config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let (request, csv_path) = match build_request(&config, overrides) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    eprintln!(
        "Running {} on {} from {}",
        request.strategy,
        request.ticker,
        csv_path.display()
    );
    let registry = StrategyRegistry::with_defaults();
    match execute_backtest(&request, &csv_path, &registry) {
        Ok(result) => {
            println!("{}", format_result(&result));
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    init_logging(&log_level(&adapter));

    let config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    let registry = StrategyRegistry::with_defaults();
    let strategy = match registry.get(&config.strategy) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    if let Err(e) = strategy.validate_parameters(&config.parameters) {
        return fail(&e);
    }

    eprintln!("\nStrategy:        {}", strategy.name());
    eprintln!("Ticker:          {}", config.ticker);
    eprintln!("Initial capital: {}", config.initial_capital);
    for (name, value) in config.parameters.iter() {
        eprintln!("  {name} = {value}");
    }
    match &config.csv_path {
        Some(path) => eprintln!("Data file:       {path}"),
        None => eprintln!("Data file:       (none, pass --data)"),
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_strategies() -> ExitCode {
    for name in StrategyRegistry::with_defaults().names() {
        println!("{name}");
    }
    ExitCode::SUCCESS
}

fn run_info(data_path: &Path, ticker: Option<&str>) -> ExitCode {
    init_logging(DEFAULT_LOG_LEVEL);

    let loader = CsvLoader::new(ticker.unwrap_or(DEFAULT_TICKER));
    let store = InMemoryDataAdapter::new();
    if let Err(e) = loader.load_into(&store, data_path) {
        return fail(&e);
    }

    match store.get_data_range(loader.ticker()) {
        Some((first, last, count)) => {
            println!("{}: {} bars, {} to {}", loader.ticker(), count, first, last);
            ExitCode::SUCCESS
        }
        None => fail(&QuantsimError::TickerNotFound {
            ticker: loader.ticker().to_string(),
        }),
    }
}

fn run_serve(config_path: &Path) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use crate::ports::config_port::ConfigPort;
        use std::net::SocketAddr;
        use std::sync::Arc;

        const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return fail(&e),
        };
        init_logging(&log_level(&config));
        if let Err(e) = validate_serve_config(&config) {
            return fail(&e);
        }

        let store = Arc::new(InMemoryDataAdapter::new());
        if let Some(csv_path) = config.get_string("data", "csv_path") {
            let ticker = config
                .get_string("data", "ticker")
                .unwrap_or_else(|| DEFAULT_TICKER.to_string());
            if let Err(e) = CsvLoader::new(&ticker).load_into(&*store, &csv_path) {
                return fail(&e);
            }
        }

        let listen = config
            .get_string("web", "listen")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let addr: SocketAddr = match listen.parse() {
            Ok(a) => a,
            Err(_) => {
                return fail(&QuantsimError::ConfigInvalid {
                    section: "web".into(),
                    key: "listen".into(),
                    reason: format!("'{listen}' is not a socket address"),
                });
            }
        };

        let state = AppState {
            data_port: store,
            registry: Arc::new(StrategyRegistry::with_defaults()),
        };
        let router = build_router(state);

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => return fail(&QuantsimError::Io(e)),
        };

        eprintln!("Starting web server on {}", addr);
        let served = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(&QuantsimError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
