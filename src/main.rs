use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use handicap_results::config::Config;
use handicap_results::notify::{BufferedSink, Notification, StderrSink};
use handicap_results::results::StandardTableGenerator;
use handicap_results::scoring::{CalculationError, ResultsCalculator};
use handicap_results::season::{HandicapModel, JsonModelStore};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_DATA: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Calculate results for one event and save them into the season
    Calculate {
        /// Path to the event JSON file (raw results)
        event: PathBuf,
        /// Recalculate even if the season already has results for this date
        #[arg(long)]
        force: bool,
    },
    /// Print the season points table
    Table,
    /// Print club Mob Trophy and Team Trophy totals
    Standings,
    /// Print the next available race number
    NextRunner,
}

#[derive(Parser, Debug)]
#[command(name = "handicap-results")]
#[command(about = "Junior handicap series results calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/handicap-results/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to season file (defaults to ~/.config/handicap-results/season.json)
    #[arg(short, long, global = true)]
    season: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: bool) {
    // RUST_LOG wins over --verbose
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { force } = cli.command {
        let path = match config_path {
            Some(p) => p,
            None => exit_on_error(handicap_results::config::get_config_path(), EXIT_CONFIG),
        };
        match handicap_results::config::write_default_config(&path, force) {
            Ok(true) => println!("Wrote default config to {}", path.display()),
            Ok(false) => {
                eprintln!(
                    "Config already exists at {}. Use --force to overwrite.",
                    path.display()
                );
                std::process::exit(EXIT_CONFIG);
            }
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match handicap_results::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let season_path = match cli.season {
        Some(p) => PathBuf::from(p),
        None => exit_on_error(handicap_results::season::get_season_path(), EXIT_DATA),
    };
    let mut model = exit_on_error(handicap_results::season::load_model(&season_path), EXIT_DATA);

    if cli.verbose {
        eprintln!(
            "Loaded season '{}' with {} athletes and {} clubs",
            model.season.name,
            model.season.athletes.len(),
            model.clubs.len()
        );
    }

    let use_colors = handicap_results::output::should_use_colors();

    match cli.command {
        Commands::Init { .. } => unreachable!("init handled above"),
        Commands::Calculate { event, force } => {
            run_calculate(&config, &mut model, season_path, event, force, use_colors, cli.verbose)
        }
        Commands::Table => {
            let descending = config
                .results
                .as_ref()
                .map_or(true, |r| r.scores_are_descending);
            println!(
                "{}",
                handicap_results::output::format_points_table(&model.season, descending, use_colors)
            );
        }
        Commands::Standings => {
            println!(
                "{}",
                handicap_results::output::format_club_standings(&model.season, use_colors)
            );
        }
        Commands::NextRunner => {
            let number = model.athletes.next_available_race_number();
            println!(
                "{}",
                handicap_results::season::format_race_number(&config.series.number_prefix, number)
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn run_calculate(
    config: &Config,
    model: &mut HandicapModel,
    season_path: PathBuf,
    event_path: PathBuf,
    force: bool,
    use_colors: bool,
    verbose: bool,
) {
    let start_time = Instant::now();

    // Validate results config at startup
    if let Err(errors) = handicap_results::scoring::validate_results_config(config.results.as_ref())
    {
        eprintln!("Results config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let mut event = exit_on_error(handicap_results::season::load_event(&event_path), EXIT_DATA);

    if model.season.has_results_for(event.date) && !force {
        eprintln!(
            "Season already has results for {}. Use --force to recalculate.",
            event.date
        );
        std::process::exit(EXIT_DATA);
    }

    let calculator = ResultsCalculator::new(
        config.results.clone(),
        config.series.clone(),
        StandardTableGenerator,
    );
    let store = JsonModelStore::new(season_path, event_path);
    // Verbose runs show progress as it happens; otherwise it follows the tables.
    let mut buffered = BufferedSink::new();
    let result = if verbose {
        calculator.calculate(model, &mut event, &store, &mut StderrSink)
    } else {
        calculator.calculate(model, &mut event, &store, &mut buffered)
    };
    let notifications = buffered.drain();

    let summary = match result {
        Ok(summary) => summary,
        Err(CalculationError::Config(_)) => {
            print_notifications(&notifications);
            std::process::exit(EXIT_CONFIG);
        }
        Err(CalculationError::Persist(e)) => {
            print_notifications(&notifications);
            eprintln!("Failed to save results: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    if let Some(table) = &event.results_table {
        println!(
            "{}",
            handicap_results::output::format_results_table(table, use_colors)
        );
    }
    println!();
    println!(
        "{}",
        handicap_results::output::format_club_standings(&model.season, use_colors)
    );
    print_notifications(&notifications);

    if verbose {
        let descending = config
            .results
            .as_ref()
            .map_or(true, |r| r.scores_are_descending);
        eprintln!();
        eprintln!(
            "Scored {} entries ({} scheme{}) in {:?}",
            summary.entries,
            if descending { "descending" } else { "ascending" },
            if summary.is_relay_event { ", relay" } else { "" },
            start_time.elapsed()
        );
    }
}

fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        eprintln!("{}", notification);
    }
}

fn exit_on_error<T>(result: anyhow::Result<T>, code: i32) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(code);
        }
    }
}
