//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::console_report::ConsoleReportAdapter;
use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::gemini_adapter::GeminiAdapter;
use crate::adapters::tavily_adapter::{NoNewsAdapter, TavilyAdapter};
use crate::adapters::yahoo_adapter::YahooAdapter;
use crate::domain::config::{MarketSource, PipelineConfig};
use crate::domain::config_validation::validate_config;
use crate::domain::error::HedgeboxError;
use crate::domain::pipeline::{PipelineOrchestrator, RunOutcome};
use crate::domain::universe::{normalize_symbol, parse_symbols};
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::news_port::NewsPort;
use crate::ports::report_port::ReportPort;
use crate::ports::scoring_port::ScoringPort;

pub const NEWS_KEY_ENV: &str = "TAVILY_API_KEY";
pub const SCORING_KEY_ENV: &str = "GOOGLE_API_KEY";

const QUIT: &str = "Q";

#[derive(Parser, Debug)]
#[command(
    name = "hedgebox",
    about = "BUY/HOLD/SELL decisions from price risk and news sentiment"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one or more symbols and print a report for each
    Analyze {
        /// Symbols, space or comma separated
        #[arg(required = true)]
        symbols: Vec<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Read symbols from stdin one per line until `q`
    Shell {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file and print the resolved settings
    CheckConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze { symbols, config } => run_analyze(&symbols, config.as_ref()),
        Command::Shell { config } => run_shell(config.as_ref()),
        Command::CheckConfig { config } => run_check_config(&config),
    }
}

fn fail(err: HedgeboxError) -> ExitCode {
    tracing::error!("{err}");
    (&err).into()
}

/// Load an INI file, or an empty configuration (all defaults) when no path is given.
pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, HedgeboxError> {
    match path {
        Some(path) => {
            tracing::info!("loading config from {}", path.display());
            FileConfigAdapter::from_file(path)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Validate, read, and fill absent API keys from the environment lookup.
pub fn resolve_config<F>(config: &dyn ConfigPort, env: F) -> Result<PipelineConfig, HedgeboxError>
where
    F: Fn(&str) -> Option<String>,
{
    validate_config(config)?;
    let mut resolved = PipelineConfig::from_config(config);

    let from_env = |name: &str| env(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    if resolved.news.api_key.is_none() {
        resolved.news.api_key = from_env(NEWS_KEY_ENV);
    }
    if resolved.scoring.api_key.is_none() {
        resolved.scoring.api_key = from_env(SCORING_KEY_ENV);
    }
    Ok(resolved)
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Concrete collaborators selected by the configuration.
pub struct Providers {
    pub market: Box<dyn MarketDataPort>,
    pub news: Box<dyn NewsPort>,
    pub scorer: Option<Box<dyn ScoringPort>>,
}

impl Providers {
    pub fn orchestrator<'a>(&'a self, config: &PipelineConfig) -> PipelineOrchestrator<'a> {
        PipelineOrchestrator::new(
            config,
            self.market.as_ref(),
            self.news.as_ref(),
            self.scorer.as_deref(),
        )
    }
}

pub fn build_providers(config: &PipelineConfig) -> Result<Providers, HedgeboxError> {
    let market: Box<dyn MarketDataPort> = match config.market.source {
        MarketSource::Yahoo => Box::new(YahooAdapter::new(config.market.timeout_secs)?),
        MarketSource::Csv => {
            let dir = config
                .market
                .csv_dir
                .as_ref()
                .ok_or_else(|| HedgeboxError::ConfigMissing {
                    section: "market".into(),
                    key: "csv_dir".into(),
                })?;
            Box::new(CsvPriceAdapter::new(PathBuf::from(dir)))
        }
    };

    let news: Box<dyn NewsPort> = match &config.news.api_key {
        Some(key) => Box::new(TavilyAdapter::new(key, config.news.timeout_secs)?),
        None => {
            tracing::warn!("no news API key ({NEWS_KEY_ENV}), running without news");
            Box::new(NoNewsAdapter)
        }
    };

    let scorer: Option<Box<dyn ScoringPort>> = match &config.scoring.api_key {
        Some(key) => Some(Box::new(GeminiAdapter::new(
            key,
            &config.scoring.model,
            config.scoring.timeout_secs,
        )?)),
        None => {
            tracing::warn!("no scoring API key ({SCORING_KEY_ENV}), sentiment will be neutral");
            None
        }
    };

    tracing::debug!(
        market = market.name(),
        news = news.name(),
        scorer = scorer.as_ref().map(|s| s.name()).unwrap_or("none"),
        "providers ready"
    );
    Ok(Providers {
        market,
        news,
        scorer,
    })
}

/// Run every symbol in order and write one report block per outcome.
pub fn analyze_symbols(
    orchestrator: &PipelineOrchestrator<'_>,
    symbols: &[String],
    report: &mut dyn ReportPort,
) -> Result<Vec<RunOutcome>, HedgeboxError> {
    let outcomes = orchestrator.run_batch(symbols);
    report.write_all(&outcomes)?;
    Ok(outcomes)
}

/// Interactive loop: one symbol per line, blank lines skipped, `q` or EOF ends it.
///
/// Lines that are not valid UTF-8 are skipped with a warning.
/// Returns the number of symbols analyzed.
pub fn shell_loop<R: BufRead, P: Write>(
    orchestrator: &PipelineOrchestrator<'_>,
    mut input: R,
    mut prompt: P,
    report: &mut dyn ReportPort,
) -> Result<usize, HedgeboxError> {
    let mut analyzed = 0;
    let mut buf = Vec::new();
    loop {
        write!(prompt, "\nTicker (or 'q' to quit): ")?;
        prompt.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let Ok(line) = std::str::from_utf8(&buf) else {
            tracing::warn!("ignoring input line that is not valid UTF-8");
            continue;
        };
        let symbol = normalize_symbol(line);
        if symbol.is_empty() {
            continue;
        }
        if symbol == QUIT {
            break;
        }

        report.write(&orchestrator.run(&symbol))?;
        analyzed += 1;
    }
    Ok(analyzed)
}

fn prepare(config_path: Option<&PathBuf>) -> Result<(PipelineConfig, Providers), HedgeboxError> {
    let adapter = load_config(config_path)?;
    let config = resolve_config(&adapter, process_env)?;
    let providers = build_providers(&config)?;
    Ok((config, providers))
}

fn run_analyze(raw_symbols: &[String], config_path: Option<&PathBuf>) -> ExitCode {
    let symbols = match parse_symbols(raw_symbols) {
        Ok(s) => s,
        Err(e) => return fail(e.into()),
    };
    let (config, providers) = match prepare(config_path) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    tracing::info!("analyzing {} symbol(s)", symbols.len());
    let orchestrator = providers.orchestrator(&config);
    let mut report = ConsoleReportAdapter::new(io::stdout().lock());
    match analyze_symbols(&orchestrator, &symbols, &mut report) {
        Ok(outcomes) => {
            let decided = outcomes.iter().filter(|o| o.snapshot().is_some()).count();
            tracing::info!("{decided} of {} symbol(s) decided", outcomes.len());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_shell(config_path: Option<&PathBuf>) -> ExitCode {
    let (config, providers) = match prepare(config_path) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    eprintln!("{}", "=".repeat(40));
    eprintln!("   HEDGEBOX");
    eprintln!("{}", "=".repeat(40));

    let orchestrator = providers.orchestrator(&config);
    let mut report = ConsoleReportAdapter::new(io::stdout());
    match shell_loop(&orchestrator, io::stdin().lock(), io::stderr(), &mut report) {
        Ok(n) => {
            tracing::info!("session closed after {n} symbol(s)");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_check_config(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(Some(config_path))
        .and_then(|adapter| resolve_config(&adapter, process_env))
    {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    print!("{}", describe_config(&config));
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn key_state(key: Option<&str>) -> &'static str {
    if key.is_some() { "set" } else { "not set" }
}

/// Human-readable dump of the resolved settings; API keys are never printed.
pub fn describe_config(config: &PipelineConfig) -> String {
    let m = &config.market;
    let source = match m.source {
        MarketSource::Yahoo => "yahoo".to_string(),
        MarketSource::Csv => format!("csv ({})", m.csv_dir.as_deref().unwrap_or("?")),
    };
    let q = &config.quant;
    let d = &config.decision;

    let mut out = String::new();
    out.push_str("[market]\n");
    out.push_str(&format!("  source:        {source}\n"));
    out.push_str(&format!("  lookback_days: {}\n", m.lookback_days));
    out.push_str("[news]\n");
    out.push_str(&format!("  api_key:       {}\n", key_state(config.news.api_key.as_deref())));
    out.push_str(&format!("  limit:         {}\n", config.news.limit));
    out.push_str("[scoring]\n");
    out.push_str(&format!("  api_key:       {}\n", key_state(config.scoring.api_key.as_deref())));
    out.push_str(&format!("  model:         {}\n", config.scoring.model));
    out.push_str("[quant]\n");
    out.push_str(&format!("  risk_free:     {}\n", q.risk_free_rate));
    out.push_str(&format!(
        "  windows:       RSI({}) SMA({})\n",
        q.oscillator_window, q.moving_average_window
    ));
    out.push_str(&format!("  bands:         {} / {}\n", q.oversold, q.overbought));
    out.push_str("[decision]\n");
    out.push_str(&format!(
        "  weights:       {} technical, {} sentiment\n",
        d.technical_weight, d.sentiment_weight
    ));
    out.push_str(&format!(
        "  thresholds:    BUY > {}, SELL < {}\n",
        d.buy_threshold, d.sell_threshold
    ));
    out
}
