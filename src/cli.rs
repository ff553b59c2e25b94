//! CLI definition and dispatch. The binary plays the host: it loads config and
//! bars, calls the allocation rule and prints the result.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::native_indicators::NativeIndicators;
use crate::adapters::tracing_log::{CountingLog, TracingLog};
use crate::domain::allocation::TargetAllocation;
use crate::domain::config_validation::{
    parse_date, validate_data_config, validate_strategy_config, DATA, STRATEGY,
};
use crate::domain::error::GrowthallocError;
use crate::domain::price_history::PriceHistory;
use crate::domain::signal::RsiThresholds;
use crate::domain::strategy::{
    allocation_of, AllocationRule, Decision, IndicatorParams, StrategyConfig, UnknownVariant,
};
use crate::domain::watchlist::Watchlist;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "growthalloc", about = "Trend/momentum target allocation for a growth watchlist")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the target allocation for one bar
    Allocate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Evaluate as of the close of this date (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Evaluate the rule on every bar and write the weights as CSV
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range for each watchlist symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

/// Install the global subscriber: `RUST_LOG` filter, default `info`, to stderr.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Allocate {
            config,
            data_dir,
            as_of,
        } => run_allocate(&config, data_dir.as_deref(), as_of),
        Command::Replay {
            config,
            data_dir,
            output,
        } => run_replay(&config, data_dir.as_deref(), output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, data_dir } => run_info(&config, data_dir.as_deref()),
    }
}

fn fail(err: GrowthallocError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(&err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, GrowthallocError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Validated strategy config. Missing keys fall back to the growth-basket defaults.
pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, GrowthallocError> {
    validate_strategy_config(config)?;
    let defaults = StrategyConfig::default();

    let interval = parse_variant(config, "interval", defaults.interval)?;
    let assets = match config.get_string(STRATEGY, "assets") {
        Some(raw) => raw.parse::<Watchlist>()?,
        None => defaults.assets,
    };
    let hold_policy = parse_variant(config, "hold_policy", defaults.hold_policy)?;

    let p = defaults.params;
    let period = |key: &str, default: usize| config.get_int(STRATEGY, key, default as i64) as usize;
    let params = IndicatorParams {
        short_ema: period("short_ema", p.short_ema),
        long_ema: period("long_ema", p.long_ema),
        rsi_length: period("rsi_length", p.rsi_length),
        macd_fast: period("macd_fast", p.macd_fast),
        macd_slow: period("macd_slow", p.macd_slow),
        macd_signal: period("macd_signal", p.macd_signal),
    };
    let thresholds = RsiThresholds {
        bullish: config.get_double(STRATEGY, "rsi_bullish", defaults.thresholds.bullish),
        bearish: config.get_double(STRATEGY, "rsi_bearish", defaults.thresholds.bearish),
    };

    Ok(StrategyConfig {
        name: config.get_string(STRATEGY, "name").unwrap_or(defaults.name),
        interval,
        assets,
        params,
        thresholds,
        hold_policy,
    })
}

fn parse_variant<T>(config: &dyn ConfigPort, key: &str, default: T) -> Result<T, GrowthallocError>
where
    T: FromStr<Err = UnknownVariant>,
{
    match config.get_string(STRATEGY, key) {
        Some(raw) => raw.parse().map_err(|e: UnknownVariant| GrowthallocError::ConfigInvalid {
            section: STRATEGY.into(),
            key: key.into(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// `[data]` date window, open-ended on either side when unset.
pub fn build_date_range(
    config: &dyn ConfigPort,
) -> Result<(NaiveDate, NaiveDate), GrowthallocError> {
    validate_data_config(config)?;
    let start = parse_date(config, "start_date")?.unwrap_or(NaiveDate::MIN);
    let end = parse_date(config, "end_date")?.unwrap_or(NaiveDate::MAX);
    Ok((start, end))
}

pub fn resolve_data_dir(
    data_dir_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, GrowthallocError> {
    if let Some(dir) = data_dir_override {
        return Ok(dir.to_path_buf());
    }
    config
        .get_string(DATA, "csv_dir")
        .map(PathBuf::from)
        .ok_or_else(|| GrowthallocError::ConfigMissing {
            section: DATA.into(),
            key: "csv_dir".into(),
        })
}

/// Fetch every watchlist symbol. A symbol that cannot be fetched is left out;
/// the rule then reports it as having no data.
pub fn load_history(
    data_port: &dyn DataPort,
    assets: &Watchlist,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<PriceHistory, GrowthallocError> {
    let mut history = PriceHistory::new();
    for symbol in assets.symbols() {
        match data_port.fetch_ohlcv(symbol, start_date, end_date) {
            Ok(bars) => {
                eprintln!("  {}: {} bars", symbol, bars.len());
                history.insert(symbol.clone(), bars);
            }
            Err(e) => eprintln!("Warning: skipping {} ({})", symbol, e),
        }
    }

    if history.is_empty() {
        return Err(GrowthallocError::NoData {
            symbols: assets.len(),
        });
    }
    Ok(history)
}

pub fn run_allocate_pipeline(
    data_port: &dyn DataPort,
    strategy: StrategyConfig,
    date_range: (NaiveDate, NaiveDate),
    as_of: Option<NaiveDate>,
    out: &mut dyn Write,
) -> Result<TargetAllocation, GrowthallocError> {
    let mut history = load_history(data_port, &strategy.assets, date_range.0, date_range.1)?;
    if let Some(as_of) = as_of {
        history = history.as_of(as_of);
    }

    let mut rule = AllocationRule::new(strategy);
    let decisions = rule.decide(&history, &NativeIndicators::new(), &TracingLog);
    write_decisions(&decisions, out)?;

    let allocation = allocation_of(&decisions);
    eprintln!(
        "Allocated {:.1}% across {} symbols",
        allocation.total() * 100.0,
        allocation.len()
    );
    Ok(allocation)
}

fn write_decisions(decisions: &[Decision], out: &mut dyn Write) -> io::Result<()> {
    for d in decisions {
        let detail = match &d.outcome {
            Ok(a) => a.outlook.to_string(),
            Err(e) => format!("error: {}", e),
        };
        writeln!(out, "{:<6} {:>8.4}  {}", d.symbol, d.weight, detail)?;
    }
    Ok(())
}

/// Call the rule once per date of the unified timeline, as a host would,
/// and write `date,<symbol>...` rows. Returns the number of rows written.
pub fn run_replay_pipeline(
    data_port: &dyn DataPort,
    strategy: StrategyConfig,
    date_range: (NaiveDate, NaiveDate),
    out: impl Write,
) -> Result<usize, GrowthallocError> {
    let history = load_history(data_port, &strategy.assets, date_range.0, date_range.1)?;
    let timeline = history.timeline();
    eprintln!("Replaying {} bars", timeline.len());

    let mut writer = csv::Writer::from_writer(out);
    let csv_err = |e: csv::Error| GrowthallocError::Io(io::Error::other(e));

    let mut header = vec!["date".to_string()];
    header.extend(strategy.assets.symbols().iter().cloned());
    writer.write_record(&header).map_err(csv_err)?;

    let indicators = NativeIndicators::new();
    let log = CountingLog::new();
    let mut rule = AllocationRule::new(strategy);

    for date in &timeline {
        let allocation = rule.compute(&history.as_of(*date), &indicators, &log);
        let mut row = vec![date.to_string()];
        row.extend(allocation.iter().map(|(_, w)| format!("{:.6}", w)));
        writer.write_record(&row).map_err(csv_err)?;
    }
    writer.flush()?;

    if log.count() > 0 {
        eprintln!(
            "{} symbol-bars fell back after indicator errors (warmup included)",
            log.count()
        );
    }
    Ok(timeline.len())
}

struct RunSetup {
    strategy: StrategyConfig,
    date_range: (NaiveDate, NaiveDate),
    data_port: CsvAdapter,
}

fn prepare(config_path: &Path, data_dir: Option<&Path>) -> Result<RunSetup, GrowthallocError> {
    let adapter = load_config(config_path)?;
    let strategy = build_strategy_config(&adapter)?;
    let date_range = build_date_range(&adapter)?;
    let dir = resolve_data_dir(data_dir, &adapter)?;
    eprintln!(
        "Strategy: {} ({} symbols, {})",
        strategy.name,
        strategy.assets.len(),
        strategy.interval
    );
    Ok(RunSetup {
        strategy,
        date_range,
        data_port: CsvAdapter::new(dir),
    })
}

fn run_allocate(config_path: &Path, data_dir: Option<&Path>, as_of: Option<NaiveDate>) -> ExitCode {
    let result = prepare(config_path, data_dir).and_then(|setup| {
        let stdout = io::stdout();
        run_allocate_pipeline(
            &setup.data_port,
            setup.strategy,
            setup.date_range,
            as_of,
            &mut stdout.lock(),
        )
    });
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn run_replay(config_path: &Path, data_dir: Option<&Path>, output: Option<&Path>) -> ExitCode {
    let result = prepare(config_path, data_dir).and_then(|setup| match output {
        Some(path) => {
            let file = File::create(path)?;
            let rows =
                run_replay_pipeline(&setup.data_port, setup.strategy, setup.date_range, file)?;
            eprintln!("Wrote {} rows to {}", rows, path.display());
            Ok(rows)
        }
        None => run_replay_pipeline(
            &setup.data_port,
            setup.strategy,
            setup.date_range,
            io::stdout().lock(),
        ),
    });
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    let result = load_config(config_path).and_then(|adapter| {
        let strategy = build_strategy_config(&adapter)?;
        let (start, end) = build_date_range(&adapter)?;
        Ok((strategy, start, end))
    });

    let (strategy, start, end) = match result {
        Ok(v) => v,
        Err(e) => return fail(e),
    };

    let p = &strategy.params;
    eprintln!("\nStrategy: {}", strategy.name);
    eprintln!("  interval:    {}", strategy.interval);
    eprintln!("  assets:      {}", strategy.assets);
    eprintln!("  EMA:         {} / {}", p.short_ema, p.long_ema);
    eprintln!(
        "  RSI:         {} (bullish > {}, bearish < {})",
        p.rsi_length, strategy.thresholds.bullish, strategy.thresholds.bearish
    );
    eprintln!("  MACD:        {},{},{}", p.macd_fast, p.macd_slow, p.macd_signal);
    eprintln!("  hold policy: {}", strategy.hold_policy);
    if start != NaiveDate::MIN || end != NaiveDate::MAX {
        eprintln!("  window:      {} to {}", start, end);
    }
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, data_dir: Option<&Path>) -> ExitCode {
    let result = prepare(config_path, data_dir).and_then(|setup| {
        write_data_info(&setup.data_port, &setup.strategy.assets, &mut io::stdout().lock())
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

/// One line per watchlist symbol with its data range, then any symbols the
/// source holds that the watchlist does not track.
pub fn write_data_info(
    data_port: &dyn DataPort,
    assets: &Watchlist,
    out: &mut dyn Write,
) -> Result<(), GrowthallocError> {
    for symbol in assets.symbols() {
        match data_port.get_data_range(symbol) {
            Ok(Some((first, last, count))) => {
                writeln!(out, "{}: {} bars, {} to {}", symbol, count, first, last)?
            }
            Ok(None) => writeln!(out, "{}: no data found", symbol)?,
            Err(e) => eprintln!("error querying {}: {}", symbol, e),
        }
    }

    let untracked: Vec<String> = data_port
        .list_symbols()?
        .into_iter()
        .filter(|s| !assets.contains(s))
        .collect();
    if !untracked.is_empty() {
        writeln!(out, "not on watchlist: {}", untracked.join(","))?;
    }
    Ok(())
}
