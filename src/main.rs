use analytics::{DashboardSummary, PartitionStats, SummaryParams, WindowStatisticsEngine};
use analyzer::{CorrelationAnalyzer, CorrelationReport};
use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::{CliOverrides, Settings};
use dataset::Dataset;
use web_server::AppState;

/// The main entry point for the GeoBrent analysis application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; every setting has a default.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = cli.overrides.load()?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => handle_serve(settings).await,
        Commands::Correlations(args) => handle_correlations(args, &settings),
        Commands::Analyze(args) => handle_analyze(args, &settings),
        Commands::Summary => handle_summary(&settings),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Explore how geopolitical and economic events line up with Brent crude prices.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: CliOverrides,

    /// Defaults to `serve` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API consumed by the dashboard.
    Serve,
    /// Rank every catalog event by the size of the price move around it.
    Correlations(CorrelationArgs),
    /// Compare prices before and after a single event.
    Analyze(AnalyzeArgs),
    /// Print the dashboard headline metrics.
    Summary,
}

#[derive(Parser)]
struct CorrelationArgs {
    /// Days on each side of the event date. Defaults to the configured value.
    #[arg(long)]
    window_days: Option<u32>,

    /// Print the full report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// The catalog id of the event to analyze.
    #[arg(long)]
    event_id: u32,

    /// Days on each side of the event date. Defaults to the configured value.
    #[arg(long)]
    window_days: Option<u32>,

    /// Print the full analysis, including every price point, as JSON.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(settings: Settings) -> anyhow::Result<()> {
    let state = AppState::load(&settings)?;
    let addr = settings.server.socket_addr()?;
    web_server::run_server(addr, state).await
}

fn handle_correlations(args: CorrelationArgs, settings: &Settings) -> anyhow::Result<()> {
    let dataset = Dataset::load(&settings.data)?;
    let window_days = args
        .window_days
        .unwrap_or(settings.analysis.correlation_window_days);
    let report = CorrelationAnalyzer::new(window_days).rank_all(&dataset);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", correlation_table(&report));
        println!(
            "Analyzed {} of {} events (±{} days). Average impact: {}, max |impact|: {:.2}%",
            report.summary.total_events_analyzed,
            dataset.events().len(),
            window_days,
            format_pct(report.summary.avg_impact),
            report.summary.max_impact,
        );
    }
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs, settings: &Settings) -> anyhow::Result<()> {
    let dataset = Dataset::load(&settings.data)?;
    let event = dataset.events().get(args.event_id)?;
    let window_days = args
        .window_days
        .unwrap_or(settings.analysis.event_window_days);

    let analysis = WindowStatisticsEngine::new().analyze(
        dataset.prices().points(),
        event.date,
        window_days,
        window_days,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!(
        "{} ({}, {}) window {} .. {}",
        event.name, event.category, event.date, analysis.window_start, analysis.window_end
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Side", "Days", "Avg Price", "Volatility"]);
    for (side, stats) in [("Before", &analysis.before), ("After", &analysis.after)] {
        table.add_row(partition_row(side, stats));
    }
    println!("{table}");

    match &analysis.impact {
        Some(impact) => println!(
            "Price change: {:+.2} ({}), volatility change: {}",
            impact.price_change,
            format_pct(Some(impact.price_change_pct)),
            impact
                .volatility_change
                .map_or_else(|| "n/a".to_string(), |v| format!("{v:+.4}")),
        ),
        None => println!("No impact metrics: one side of the window has no prices."),
    }
    Ok(())
}

fn handle_summary(settings: &Settings) -> anyhow::Result<()> {
    let dataset = Dataset::load(&settings.data)?;
    let summary = DashboardSummary::compute(
        dataset.prices().points(),
        dataset.events().events(),
        dataset.change_points().len(),
        SummaryParams {
            today: Utc::now().date_naive(),
            volatility_window: settings.analysis.summary_volatility_window,
            recent_event_days: settings.analysis.recent_event_days,
        },
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

// ==============================================================================
// Formatting Helpers
// ==============================================================================

fn correlation_table(report: &CorrelationReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Rank", "Id", "Date", "Type", "Event", "Impact"]);
    for (rank, c) in report.correlations.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            c.event_id.to_string(),
            c.date.to_string(),
            c.category.to_string(),
            c.event.clone(),
            format_pct(Some(c.impact_percentage)),
        ]);
    }
    table
}

fn partition_row(side: &str, stats: &PartitionStats) -> Vec<String> {
    vec![
        side.to_string(),
        stats.count.to_string(),
        stats
            .avg_price
            .map_or_else(|| "n/a".to_string(), |p| format!("{p:.2}")),
        stats
            .volatility
            .map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}")),
    ]
}

fn format_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:+.2}%"))
}
