use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use col_chart::viz::raster;
use col_chart::{ChartConfig, ChartRenderer, Dataset, SelectionState, stats, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "colchart",
    version,
    about = "Render the London cost-of-living survey as a grouped bar chart"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the chart to .svg, .html or .png.
    Render(RenderArgs),
    /// List the time periods of the dataset.
    Periods(DataArgs),
    /// Print per-period statistics and per-category change.
    Stats(StatsArgs),
    /// Write the dataset as CSV or JSON (by extension).
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Load data from a CSV (category,period_id,period_label,value) or JSON file instead of the built-in survey.
    #[arg(long)]
    data: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Period ids separated by comma or semicolon (e.g., jan22,sept22), or "all".
    #[arg(short, long)]
    periods: Option<String>,
    /// Output path; format inferred from the extension (svg, html, otherwise png).
    #[arg(short, long)]
    out: PathBuf,
    /// JSON layout config (any subset of the fields; the rest use defaults).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Chart title (defaults to the dataset title).
    #[arg(long)]
    title: Option<String>,
    /// Font file used for text in PNG output.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Outer width of the chart.
    #[arg(long)]
    width: Option<u32>,
    /// Outer height of the chart.
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Period ids to summarize (default: all).
    #[arg(short, long)]
    periods: Option<String>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Destination file (.csv or .json).
    #[arg(short, long)]
    out: PathBuf,
}

fn fmt_pct(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.2}", x * 100.0);
            format!("{}%", s.trim_end_matches('0').trim_end_matches('.'))
        }
        _ => "NA".to_string(),
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_selection(dataset: &Dataset, periods: Option<&str>, default_all: bool) -> SelectionState {
    match periods {
        Some(s) if s.trim().eq_ignore_ascii_case("all") => SelectionState::all(dataset),
        Some(s) => SelectionState::from_ids(dataset, parse_list(s)),
        None if default_all => SelectionState::all(dataset),
        None => SelectionState::new(),
    }
}

fn load_dataset(args: &DataArgs) -> Result<Dataset> {
    match &args.data {
        Some(path) => storage::load(path),
        None => Ok(Dataset::london_cost_of_living()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Periods(args) => cmd_periods(args),
        Command::Stats(args) => cmd_stats(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let dataset = load_dataset(&args.data)?;
    let mut config = match &args.config {
        Some(path) => ChartConfig::from_json_file(path)?,
        None => ChartConfig::default(),
    };
    if let Some(title) = args.title {
        config.title = Some(title);
    }
    if let Some(w) = args.width {
        config.width = w;
    }
    if let Some(h) = args.height {
        config.height = h;
    }
    if let Some(font) = args.font.as_ref() {
        raster::register_font_file(font)?;
    }

    let selection = parse_selection(&dataset, args.periods.as_deref(), false);
    let mut chart = ChartRenderer::new(dataset, config);
    chart.update(&selection);
    chart.settle();
    chart.save(&args.out)?;
    eprintln!(
        "Wrote chart with {} period(s) to {}",
        selection.len(),
        args.out.display()
    );
    Ok(())
}

fn cmd_periods(args: DataArgs) -> Result<()> {
    let dataset = load_dataset(&args)?;
    for p in dataset.periods() {
        println!("{}\t{}", p.id, p.label);
    }
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> Result<()> {
    let dataset = load_dataset(&args.data)?;
    let selection = parse_selection(&dataset, args.periods.as_deref(), true);
    for s in stats::period_summary(&dataset, &selection) {
        println!(
            "{} ({})  count={}  min={} max={} mean={} median={}  top={}",
            s.period_label,
            s.period_id,
            s.count,
            fmt_pct(s.min),
            fmt_pct(s.max),
            fmt_pct(s.mean),
            fmt_pct(s.median),
            s.top_category.as_deref().unwrap_or("NA")
        );
    }
    for c in stats::category_change(&dataset) {
        println!(
            "{}: {} -> {} ({:+} pts)",
            c.category,
            fmt_pct(Some(c.first)),
            fmt_pct(Some(c.last)),
            c.delta_points
        );
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let dataset = load_dataset(&args.data)?;
    let fmt = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv")
        .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(&dataset, &args.out)?,
        "json" => storage::save_json(&dataset, &args.out)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    eprintln!(
        "Saved {} categories to {}",
        dataset.categories().len(),
        args.out.display()
    );
    Ok(())
}
