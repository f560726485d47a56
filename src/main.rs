use chrono::Local;
use clap::{Args, Parser, Subcommand};
use percept_audit::chart;
use percept_audit::config::AppConfig;
use percept_audit::error::AppError;
use percept_audit::reconcile::{ComparisonReport, DemographicComparison, DimensionReport};
use percept_audit::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "percept-audit",
    about = "Compare model-perceived demographic observations against US Census reference distributions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print census vs model percentage breakdowns per dimension
    Report(ReportArgs),
    /// Render the comparison as grouped bar charts (SVG)
    Charts(ChartArgs),
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Path to the census demographic CSV export
    #[arg(long)]
    census_csv: PathBuf,
    /// Path to the perceived-attribute observations CSV
    #[arg(long)]
    observations_csv: PathBuf,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ChartArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Directory for the rendered SVGs (overrides APP_CHART_DIR)
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(config.environment, &config.telemetry)?;

    match cli.command {
        Command::Report(args) => run_report(args),
        Command::Charts(args) => run_charts(args, &config),
    }
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let comparison = load_comparison(&args.data)?;
    let report = ComparisonReport::new(&comparison, Local::now().date_naive());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }

    Ok(())
}

fn run_charts(args: ChartArgs, config: &AppConfig) -> Result<(), AppError> {
    let comparison = load_comparison(&args.data)?;
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| config.charts.output_dir.clone());

    let written = chart::render_all(&comparison, &out_dir)?;
    info!(charts = written.len(), dir = %out_dir.display(), "charts rendered");

    for path in written {
        println!("wrote {}", path.display());
    }

    Ok(())
}

fn load_comparison(data: &DataArgs) -> Result<DemographicComparison, AppError> {
    let comparison =
        DemographicComparison::from_paths(&data.census_csv, &data.observations_csv)?;
    info!(
        observations = comparison.observation_count,
        "datasets reconciled"
    );
    Ok(comparison)
}

fn render_report(report: &ComparisonReport) {
    println!("Census vs model demographic comparison");
    println!(
        "Generated {} from {} observations",
        report.generated_on, report.observation_count
    );

    for dimension in report.dimensions() {
        render_dimension(dimension);
    }
}

fn render_dimension(dimension: &DimensionReport) {
    println!("\n{}", heading(dimension.dimension));

    println!("  Census:");
    for share in dimension.census.iter() {
        println!("  - {}: {:.1}%", share.label, share.percent);
    }

    println!("  Model:");
    for share in dimension.model.iter() {
        println!("  - {}: {:.1}%", share.label, share.percent);
    }
}

fn heading(dimension: &str) -> String {
    let mut chars = dimension.chars();
    match chars.next() {
        Some(first) => format!("{}{} distribution", first.to_uppercase(), chars.as_str()),
        None => "Distribution".to_string(),
    }
}
