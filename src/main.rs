//! Command-line front end: plan the visiting order of one destination group.

use beat_route::cancel::CancellationToken;
use beat_route::config::Config;
use beat_route::destinations::load_destination_groups;
use beat_route::problem::Coordinate;
use beat_route::provider::{
    CostMatrixProvider, GeometryProvider, JsonMatrixProvider, StraightLineGeometry,
    StraightLineProvider,
};
use beat_route::utils::{
    format_plan_summary, print_route_visualization, save_route_plan, PlanStatistics,
};
use beat_route::{plan_route, PlanRequest};
use clap::Parser;
use log::{debug, error, LevelFilter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "beat-route", author, version, about, long_about = None)]
struct Args {
    /// Destination spreadsheet exported as CSV
    #[arg(short, long)]
    input: PathBuf,

    /// Destination group (beat) to plan
    #[arg(short, long, required_unless_present = "list_groups")]
    group: Option<String>,

    /// List the groups found in the input and exit
    #[arg(long)]
    list_groups: bool,

    /// Start location as "lat,lng"
    #[arg(short, long, required_unless_present = "list_groups")]
    start: Option<String>,

    /// Precomputed distance/duration matrices as JSON; straight-line estimate otherwise
    #[arg(short, long)]
    matrix: Option<PathBuf>,

    /// Travel speed in km/h for the straight-line estimate
    #[arg(long, default_value_t = 30.0)]
    speed: f64,

    /// Optimizer configuration as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed of the randomized construction
    #[arg(long)]
    seed: Option<u64>,

    /// Restarts of the randomized construction
    #[arg(long)]
    trials: Option<usize>,

    /// Ranked index of the option to export
    #[arg(long, default_value_t = 0)]
    select: usize,

    /// Write the selected route to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the ranked options as JSON
    #[arg(long)]
    json: bool,

    /// Draw the selected route in the terminal
    #[arg(long)]
    plot: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let groups = load_destination_groups(&args.input)?;

    if args.list_groups {
        for (name, points) in &groups {
            println!("{name}: {} destinations", points.len());
        }
        return Ok(());
    }

    let name = args.group.unwrap_or_default();
    let destinations = groups.get(&name).cloned().unwrap_or_default();
    let start = args.start.as_deref().map(Coordinate::parse).transpose()?;

    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::new(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(trials) = args.trials {
        config = config.with_randomized_trials(trials);
    }

    let provider: Box<dyn CostMatrixProvider> = match &args.matrix {
        Some(path) => Box::new(JsonMatrixProvider::new(path)),
        None => Box::new(StraightLineProvider::new(args.speed / 3.6)),
    };

    let request = PlanRequest {
        name,
        start,
        destinations,
    };

    let started = Instant::now();
    let mut plan = plan_route(&request, provider.as_ref(), &config, &CancellationToken::new())?;
    let runtime = started.elapsed();

    if let (Some(best), Some(worst)) = (plan.options.best(), plan.options.options().last()) {
        let statistics = PlanStatistics {
            runtime,
            destinations: plan.problem.get_destination_count(),
            options: plan.options.len(),
            best_option: best.name.clone(),
            best_distance: best.total_distance,
            worst_distance: worst.total_distance,
        };
        println!("{}", statistics.format());
        println!();
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan.options)?);
    } else {
        for (rank, option) in plan.options.options().iter().enumerate() {
            println!(
                "{rank}: {} - {:.2} km, {:.0} min",
                option.name,
                option.total_distance / 1000.0,
                option.total_duration / 60.0
            );
        }
        println!();
    }

    plan.select(args.select)?;
    let selected = plan.selected()?;
    println!("{}", format_plan_summary(selected, &plan.problem));

    if let Some(path) = &args.output {
        let summary = save_route_plan(selected, &plan.problem, path)?;
        println!("Saved route to {}", path.display());
        println!("Saved summary to {}", summary.display());
    }

    if args.plot {
        let coordinates: Vec<Coordinate> = selected
            .route
            .stops()
            .iter()
            .map(|&stop| plan.problem.coordinate(stop))
            .collect();
        let polyline = StraightLineGeometry.geometry(&coordinates)?;
        debug!("route geometry has {} points", polyline.len());
        print_route_visualization(selected, &plan.problem, &polyline);
    }

    Ok(())
}
