mod error;
mod scenario;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use error::{CliError, CliResult};
use rc_core::ReportFormat;
use rc_metrics::{ComfortMetrics, ReportHeader, compute_metrics, format_report};
use rc_results::{AnalysisCollection, AnalysisRecord};
use rc_sim::{Trajectory, run_batch};
use scenario::ScenarioFile;

#[derive(Parser)]
#[command(name = "rc-cli")]
#[command(about = "RideComfort CLI - vehicle suspension ride simulation", long_about = None)]
struct Cli {
    /// Log solver progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scenario and print its comfort metrics
    Run {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Add the analysis to this JSON file (merged with existing content)
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
    /// Run several scenarios in parallel
    Batch {
        /// Paths to scenario YAML files
        #[arg(required = true)]
        scenario_paths: Vec<PathBuf>,
        /// Add the successful analyses to this JSON file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
    /// List analyses stored in a results file
    List {
        /// Path to the results JSON file
        results_path: PathBuf,
    },
    /// Recompute and print the metrics of a stored analysis
    Show {
        /// Path to the results JSON file
        results_path: PathBuf,
        /// Analysis name (defaults to the last one added)
        name: Option<String>,
    },
    /// Print metrics of several stored analyses side by side
    Compare {
        /// Path to the results JSON file
        results_path: PathBuf,
        /// Analysis names; unknown names are skipped
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Run {
            scenario_path,
            export,
        } => cmd_run(&scenario_path, export.as_deref()),
        Commands::Batch {
            scenario_paths,
            export,
        } => cmd_batch(&scenario_paths, export.as_deref()),
        Commands::List { results_path } => cmd_list(&results_path),
        Commands::Show { results_path, name } => cmd_show(&results_path, name.as_deref()),
        Commands::Compare {
            results_path,
            names,
        } => cmd_compare(&results_path, &names),
    }
}

fn cmd_run(scenario_path: &Path, export: Option<&Path>) -> CliResult<()> {
    let file = ScenarioFile::load(scenario_path)?;
    let scenario = file.to_scenario()?;
    println!("Running scenario: {}", scenario.name);

    let started = Instant::now();
    let traj = scenario.run()?;
    let elapsed = started.elapsed().as_secs_f64();
    print_solver_summary(&traj, elapsed);

    let record = AnalysisRecord::from_scenario(&scenario, &traj);
    let metrics = compute_metrics(&traj)?;
    print_report(&record, &metrics, &file.report);

    if let Some(path) = export {
        export_records(path, vec![record])?;
    }
    Ok(())
}

fn cmd_batch(scenario_paths: &[PathBuf], export: Option<&Path>) -> CliResult<()> {
    let files = scenario_paths
        .iter()
        .map(|p| ScenarioFile::load(p))
        .collect::<CliResult<Vec<_>>>()?;
    let scenarios = files
        .iter()
        .map(ScenarioFile::to_scenario)
        .collect::<CliResult<Vec<_>>>()?;
    println!("Running {} scenarios", scenarios.len());

    let started = Instant::now();
    let results = run_batch(&scenarios);
    println!("Batch finished in {:.3}s", started.elapsed().as_secs_f64());

    let mut records = Vec::new();
    let mut failures = 0;
    for ((file, scenario), result) in files.iter().zip(&scenarios).zip(results) {
        match result {
            Ok(traj) => {
                let record = AnalysisRecord::from_scenario(scenario, &traj);
                let metrics = compute_metrics(&traj)?;
                print_report(&record, &metrics, &file.report);
                records.push(record);
            }
            Err(e) => {
                failures += 1;
                println!("✗ {}: {}", scenario.name, e);
            }
        }
    }

    if let Some(path) = export
        && !records.is_empty()
    {
        export_records(path, records)?;
    }

    if failures > 0 {
        return Err(CliError::Simulation(format!(
            "{} of {} scenarios failed",
            failures,
            scenarios.len()
        )));
    }
    Ok(())
}

fn cmd_list(results_path: &Path) -> CliResult<()> {
    let collection = AnalysisCollection::load(results_path)?;
    if collection.is_empty() {
        println!("No analyses found in {}", results_path.display());
        return Ok(());
    }
    println!("Analyses in {}:", results_path.display());
    for record in &collection {
        println!(
            "  {} - {} on {} road ({} samples, {})",
            record.name,
            record.vehicle_model.kind,
            record.road_profile.kind,
            record.results.t.len(),
            record.execution_date
        );
    }
    Ok(())
}

fn cmd_show(results_path: &Path, name: Option<&str>) -> CliResult<()> {
    let collection = AnalysisCollection::load(results_path)?;
    let record = match name {
        Some(name) => collection.require(name)?,
        None => collection
            .last()
            .ok_or_else(|| CliError::AnalysisNotFound("<empty collection>".to_string()))?,
    };
    let metrics = record.metrics()?;
    print_report(record, &metrics, &ReportFormat::default());
    Ok(())
}

fn cmd_compare(results_path: &Path, names: &[String]) -> CliResult<()> {
    let collection = AnalysisCollection::load(results_path)?;
    let records = collection.compare(names);
    if records.is_empty() {
        println!("None of the requested analyses were found");
        return Ok(());
    }

    let metrics = records
        .iter()
        .map(|r| r.metrics())
        .collect::<Result<Vec<_>, _>>()?;

    // Rows are keyed by the first analysis; others may be a different variant.
    let fields = metrics[0].fields();
    print!("{:<34}", "metric");
    for record in &records {
        print!(" {:>16}", record.name);
    }
    println!();
    for (key, _) in &fields {
        print!("{key:<34}");
        for m in &metrics {
            match m.field(key) {
                Some(v) => print!(" {v:>16.4}"),
                None => print!(" {:>16}", "-"),
            }
        }
        println!();
    }
    Ok(())
}

fn export_records(path: &Path, records: Vec<AnalysisRecord>) -> CliResult<()> {
    let mut collection = if path.exists() {
        AnalysisCollection::load(path)?
    } else {
        AnalysisCollection::new()
    };
    let count = records.len();
    for record in records {
        collection.add(record);
    }
    collection.export_json(path)?;
    println!("✓ Exported {} analyses to {}", count, path.display());
    Ok(())
}

fn print_solver_summary(traj: &Trajectory, elapsed_s: f64) {
    println!("✓ Integrated {} samples in {:.3}s", traj.len(), elapsed_s);
    println!(
        "  Steps: {} accepted, {} rejected, {} derivative evaluations",
        traj.stats.accepted_steps, traj.stats.rejected_steps, traj.stats.rhs_evals
    );
}

fn print_report(record: &AnalysisRecord, metrics: &ComfortMetrics, format: &ReportFormat) {
    let header = ReportHeader {
        name: &record.name,
        execution_date: &record.execution_date,
        t_span: record.t_span,
    };
    print!("{}", format_report(&header, metrics, format));
    println!();
}
