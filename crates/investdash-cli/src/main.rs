mod commands;
mod input;
mod output;
mod settings;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::dashboard::{SetCurrencyArgs, SetFlowArgs, SetInvestmentArgs, SetRateArgs};
use commands::metrics::MetricsArgs;
use commands::Session;
use settings::AppConfig;

/// Investment dashboard: NPV, IRR, payback, ROI and profitability index
#[derive(Parser)]
#[command(
    name = "investdash",
    version,
    about = "Investment dashboard: NPV, IRR, payback, ROI and profitability index",
    long_about = "Keeps one investment scenario (initial outlay, discount rate, currency and \
                  period cash flows) in local storage, recomputes capital-budgeting \
                  indicators after every edit, charts the cumulative balance and can ask \
                  a generative-text service for an executive narrative."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    output: OutputFormat,

    /// Directory holding the saved scenario (overrides INVESTDASH_STATE_DIR)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Treat malformed numbers as 0 instead of rejecting them
    #[arg(long, global = true)]
    lenient: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard for the saved scenario
    Show,
    /// Compute metrics for a scenario from a file, stdin or flags
    Metrics(MetricsArgs),
    /// Set the initial investment
    SetInvestment(SetInvestmentArgs),
    /// Set the discount rate (percent)
    SetRate(SetRateArgs),
    /// Set the display currency
    SetCurrency(SetCurrencyArgs),
    /// Set the amount of one period's cash flow
    SetFlow(SetFlowArgs),
    /// Append a new period with a zero cash flow
    AddPeriod,
    /// Remove the last period
    RemovePeriod,
    /// Restore the default scenario
    Reset,
    /// Chart the cumulative cash-flow balance
    Chart,
    /// Ask the AI service for an executive narrative
    Insight,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

/// Stderr logging; `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut app_config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: invalid configuration: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    if let Some(dir) = cli.state_dir {
        app_config.state_dir = dir;
    }
    init_tracing(&app_config.log_level);

    let session = Session::new(&app_config, cli.lenient);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Show => commands::dashboard::run_show(&session),
        Commands::Metrics(args) => commands::metrics::run_metrics(&session, args),
        Commands::SetInvestment(args) => commands::dashboard::run_set_investment(&session, args),
        Commands::SetRate(args) => commands::dashboard::run_set_rate(&session, args),
        Commands::SetCurrency(args) => commands::dashboard::run_set_currency(&session, args),
        Commands::SetFlow(args) => commands::dashboard::run_set_flow(&session, args),
        Commands::AddPeriod => commands::dashboard::run_add_period(&session),
        Commands::RemovePeriod => commands::dashboard::run_remove_period(&session),
        Commands::Reset => commands::dashboard::run_reset(&session),
        Commands::Chart => commands::dashboard::run_chart(&session),
        Commands::Insight => commands::insight::run_insight(&session, &app_config).await,
        Commands::Version => {
            println!("investdash {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
