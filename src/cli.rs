//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::chart_svg::generate_returns_svg;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::domain::allocation::{Allocation, allocate_momentum, parse_total_funds};
use crate::domain::dashboard::{
    Dashboard, Report, build_dashboard, compare, default_compare_start,
};
use crate::domain::error::MomentumError;
use crate::domain::fetch::{fetch_price_table, fetch_series, FetchFailure};
use crate::domain::price_table::PriceTable;
use crate::domain::ranking::RankedEntry;
use crate::domain::returns::ReturnTable;
use crate::domain::settings::{Settings, SourceKind};
use crate::domain::universe::parse_symbols;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "momentum", about = "Equity momentum screener")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank the universe over every window and write the HTML dashboard
    Scan {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Evaluation date, defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print to stdout only
        #[arg(long)]
        no_report: bool,
        /// Comma-separated symbols to chart over the lookback range
        #[arg(long)]
        compare: Option<String>,
    },
    /// Split funds equally across the momentum stocks
    Allocate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(long)]
        funds: Option<String>,
    },
    /// Cumulative returns of chosen symbols over a date range
    Compare {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Comma-separated symbols from the universe
        #[arg(long)]
        symbols: String,
        /// Defaults to 2021-01-01
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Write the comparison chart as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Save price snapshots as CSV files, one per symbol
    Download {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        dir: PathBuf,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// List the ticker universe
    Symbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Scan {
            config,
            as_of,
            output,
            no_report,
            compare,
        } => run_scan(
            config.as_ref(),
            as_of,
            output.as_ref(),
            no_report,
            compare.as_deref(),
        ),
        Command::Allocate {
            config,
            as_of,
            funds,
        } => run_allocate(config.as_ref(), as_of, funds.as_deref()),
        Command::Compare {
            config,
            symbols,
            start,
            end,
            svg,
        } => run_compare(config.as_ref(), &symbols, start, end, svg.as_ref()),
        Command::Download { config, dir, as_of } => {
            run_download(config.as_ref(), &dir, as_of)
        }
        Command::Symbols { config } => run_symbols(config.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::Serve { config, as_of } => run_serve(config.as_ref(), as_of),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, MomentumError> {
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Settings from `path`, or the built-in defaults when no file is given.
pub fn load_settings(path: Option<&PathBuf>) -> Result<Settings, MomentumError> {
    match path {
        Some(path) => Settings::from_config(&load_config(path)?),
        None => Ok(Settings::default()),
    }
}

pub fn open_price_source(
    settings: &Settings,
) -> Result<Box<dyn PricePort + Send + Sync>, MomentumError> {
    match settings.source {
        SourceKind::Csv => {
            let dir = settings
                .csv_dir
                .clone()
                .ok_or_else(|| MomentumError::ConfigMissing {
                    section: "data".to_string(),
                    key: "csv_dir".to_string(),
                })?;
            tracing::info!(dir = %dir.display(), "reading CSV snapshots");
            Ok(Box::new(CsvAdapter::new(dir)))
        }
        SourceKind::Yahoo => {
            #[cfg(feature = "yahoo")]
            {
                use crate::adapters::yahoo_adapter::YahooAdapter;
                Ok(Box::new(YahooAdapter::with_rate_limit(settings.throttle)?))
            }

            #[cfg(not(feature = "yahoo"))]
            {
                Err(MomentumError::DataSource {
                    reason: "yahoo feature is required for source = yahoo".to_string(),
                })
            }
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub struct ScanResult {
    pub prices: PriceTable,
    pub dashboard: Dashboard,
    pub failures: Vec<FetchFailure>,
}

/// Fetch the universe over the lookback range and rank every window.
pub fn run_scan_pipeline(
    port: &dyn PricePort,
    settings: &Settings,
    as_of: NaiveDate,
) -> Result<ScanResult, MomentumError> {
    let start = settings.fetch_start(as_of);
    tracing::info!(
        symbols = settings.universe.count(),
        %start,
        end = %as_of,
        "fetching prices"
    );
    let outcome = fetch_price_table(
        port,
        &settings.universe.symbols,
        start,
        as_of,
        settings.on_error,
    )?;

    let dashboard = build_dashboard(&outcome.table, &settings.ranking, as_of);
    Ok(ScanResult {
        prices: outcome.table,
        dashboard,
        failures: outcome.failures,
    })
}

fn run_scan(
    config_path: Option<&PathBuf>,
    as_of: Option<NaiveDate>,
    output_path: Option<&PathBuf>,
    no_report: bool,
    compare_symbols: Option<&str>,
) -> Result<(), MomentumError> {
    let settings = load_settings(config_path)?;
    // Reject unknown comparison symbols before any fetching.
    let compare_symbols = match compare_symbols {
        Some(raw) => Some(settings.universe.pick(&parse_symbols(raw)?)?),
        None => None,
    };
    let port = open_price_source(&settings)?;
    let as_of = as_of.unwrap_or_else(today);

    let scan = run_scan_pipeline(port.as_ref(), &settings, as_of)?;
    let allocations = allocate_momentum(
        &scan.dashboard.momentum_symbols(),
        settings.total_funds,
        &scan.prices,
    )?;
    let comparison = compare_symbols.map(|picked| compare(&scan.prices, &picked));

    let mut out = io::stdout().lock();
    print_dashboard(&mut out, &scan.dashboard)?;
    print_allocation(&mut out, settings.total_funds, &allocations)?;
    if let Some(returns) = &comparison {
        writeln!(out)?;
        print_comparison(&mut out, returns)?;
    }
    print_failures(&mut out, &scan.failures)?;

    if no_report {
        return Ok(());
    }

    let output = output_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| settings.report_output.clone());
    let mut report = Report::new(&scan.dashboard)
        .with_failures(&scan.failures)
        .with_allocation(settings.total_funds, &allocations);
    if let Some(returns) = &comparison {
        report = report.with_comparison(returns);
    }
    HtmlReportAdapter::new().write(&report, &output)?;
    eprintln!("Report written to: {output}");
    Ok(())
}

fn run_allocate(
    config_path: Option<&PathBuf>,
    as_of: Option<NaiveDate>,
    funds: Option<&str>,
) -> Result<(), MomentumError> {
    let settings = load_settings(config_path)?;
    let total = match funds {
        Some(raw) => parse_total_funds(raw)?,
        None => settings.total_funds,
    };
    let port = open_price_source(&settings)?;
    let as_of = as_of.unwrap_or_else(today);

    let scan = run_scan_pipeline(port.as_ref(), &settings, as_of)?;
    let allocations = allocate_momentum(&scan.dashboard.momentum_symbols(), total, &scan.prices)?;

    let mut out = io::stdout().lock();
    print_allocation(&mut out, total, &allocations)?;
    print_failures(&mut out, &scan.failures)?;
    Ok(())
}

/// Cumulative returns of `symbols` (validated against the universe) between
/// `start` and `end`.
pub fn run_compare_pipeline(
    port: &dyn PricePort,
    settings: &Settings,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ReturnTable, MomentumError> {
    let picked = settings.universe.pick(symbols)?;
    let outcome = fetch_price_table(port, &picked, start, end, settings.on_error)?;
    Ok(compare(&outcome.table, &picked))
}

fn run_compare(
    config_path: Option<&PathBuf>,
    symbols: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    svg_path: Option<&PathBuf>,
) -> Result<(), MomentumError> {
    let settings = load_settings(config_path)?;
    let requested = parse_symbols(symbols)?;
    let start = start.unwrap_or_else(default_compare_start);
    let end = end.unwrap_or_else(today);
    let port = open_price_source(&settings)?;

    let returns = run_compare_pipeline(port.as_ref(), &settings, &requested, start, end)?;
    print_comparison(&mut io::stdout().lock(), &returns)?;

    if let Some(path) = svg_path {
        let svg = generate_returns_svg(&returns, &format!("{start} to {end}"));
        std::fs::write(path, svg)?;
        eprintln!("Chart written to: {}", path.display());
    }
    Ok(())
}

fn run_download(
    config_path: Option<&PathBuf>,
    dir: &Path,
    as_of: Option<NaiveDate>,
) -> Result<(), MomentumError> {
    let settings = load_settings(config_path)?;
    let port = open_price_source(&settings)?;
    let as_of = as_of.unwrap_or_else(today);
    let start = settings.fetch_start(as_of);

    let (series, failures) = fetch_series(
        port.as_ref(),
        &settings.universe.symbols,
        start,
        as_of,
        settings.on_error,
    )?;

    let sink = CsvAdapter::new(dir.to_path_buf());
    for (symbol, points) in &series {
        let path = sink.write_series(symbol, points)?;
        tracing::debug!(path = %path.display(), rows = points.len(), "snapshot written");
    }

    eprintln!(
        "Wrote {} snapshots to {} ({start} to {as_of})",
        series.len(),
        dir.display()
    );
    print_failures(&mut io::stdout().lock(), &failures)?;
    Ok(())
}

fn run_symbols(config_path: Option<&PathBuf>) -> Result<(), MomentumError> {
    let settings = load_settings(config_path)?;
    let mut out = io::stdout().lock();
    for symbol in &settings.universe.symbols {
        writeln!(out, "{symbol}")?;
    }
    eprintln!("{} symbols", settings.universe.count());
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), MomentumError> {
    let settings = Settings::from_config(&load_config(config_path)?)?;

    let mut out = io::stdout().lock();
    writeln!(out, "Config is valid.")?;
    writeln!(out, "  Universe:  {} symbols", settings.universe.count())?;
    writeln!(out, "  Source:    {:?}", settings.source)?;
    writeln!(out, "  Windows:   {:?}", settings.ranking.windows)?;
    writeln!(out, "  Top K:     {}", settings.ranking.top_k)?;
    writeln!(out, "  Lookback:  {} days", settings.lookback_days)?;
    writeln!(out, "  On error:  {}", settings.on_error)?;
    writeln!(out, "  Funds:     {:.2}", settings.total_funds)?;
    Ok(())
}

fn run_serve(
    config_path: Option<&PathBuf>,
    as_of: Option<NaiveDate>,
) -> Result<(), MomentumError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use std::net::SocketAddr;
        use std::sync::Arc;

        let settings = load_settings(config_path)?;
        let addr: SocketAddr = settings
            .listen
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                MomentumError::config_invalid("web", "listen", e.to_string())
            })?;
        let port: Arc<dyn PricePort + Send + Sync> = Arc::from(open_price_source(&settings)?);

        let mut state = AppState::new(port, settings);
        if let Some(as_of) = as_of {
            state = state.with_as_of(as_of);
        }
        let router = build_router(state);

        tracing::info!(%addr, "starting web server");
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        })?;
        Ok(())
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = (config_path, as_of);
        Err(MomentumError::DataSource {
            reason: "web feature is required for serve".to_string(),
        })
    }
}

fn fmt_pct(value: f64) -> String {
    format!("{:+.2}%", value * 100.0)
}

fn print_ranked(out: &mut impl Write, entries: &[RankedEntry]) -> io::Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        let ret = fmt_pct(entry.final_return);
        writeln!(out, "  {:>2}. {:<16} {:>9}", i + 1, entry.symbol, ret)?;
    }
    Ok(())
}

pub fn print_dashboard(out: &mut impl Write, dashboard: &Dashboard) -> io::Result<()> {
    writeln!(out, "Momentum screen as of {}", dashboard.as_of)?;

    for window in &dashboard.windows {
        writeln!(
            out,
            "\n=== {} day window ({} to {}) ===",
            window.days, window.start, window.end
        )?;
        writeln!(out, "Best:")?;
        print_ranked(out, &window.best)?;
        writeln!(out, "Worst:")?;
        print_ranked(out, &window.worst)?;
    }

    writeln!(out, "\n=== Momentum Stocks ===")?;
    if dashboard.momentum.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for p in &dashboard.momentum {
        writeln!(out, "  {:<16} {} windows", p.symbol, p.frequency)?;
    }

    writeln!(out, "\n=== Weak Stocks ===")?;
    if dashboard.weak.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for p in &dashboard.weak {
        writeln!(out, "  {:<16} {} windows", p.symbol, p.frequency)?;
    }
    Ok(())
}

pub fn print_allocation(
    out: &mut impl Write,
    total: f64,
    allocations: &[Allocation],
) -> io::Result<()> {
    writeln!(out, "\n=== Allocation (total {total:.2}) ===")?;
    if allocations.is_empty() {
        writeln!(out, "  No momentum stocks to allocate.")?;
    }
    for a in allocations {
        match (a.latest_price, a.quantity) {
            (Some(price), Some(quantity)) => writeln!(
                out,
                "  {:<16} {:>10.2}  @ {:>10.2}  qty {:.4}",
                a.symbol, a.amount, price, quantity
            )?,
            _ => writeln!(
                out,
                "  {:<16} {:>10.2}  price unavailable",
                a.symbol, a.amount
            )?,
        }
    }
    Ok(())
}

pub fn print_comparison(out: &mut impl Write, returns: &ReturnTable) -> io::Result<()> {
    match (returns.dates().first(), returns.dates().last()) {
        (Some(first), Some(last)) => {
            writeln!(out, "=== Cumulative returns ({first} to {last}) ===")?
        }
        _ => writeln!(out, "=== Cumulative returns ===")?,
    }
    for (symbol, ret) in returns.final_returns() {
        match ret {
            Some(r) => writeln!(out, "  {:<16} {:>9}", symbol, fmt_pct(r))?,
            None => writeln!(out, "  {:<16} {:>9}", symbol, "n/a")?,
        }
    }
    Ok(())
}

pub fn print_failures(out: &mut impl Write, failures: &[FetchFailure]) -> io::Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n=== Skipped symbols ===")?;
    for f in failures {
        writeln!(out, "  {}: {}", f.symbol, f.reason)?;
    }
    Ok(())
}
