use std::error::Error;
use std::fs;

use chrono::Local;
use colored::Colorize;
use csv::Writer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fleetroute::fixtures::data_generator::generate_instance;
use fleetroute::{optimize, solve_greedy, OptimizationConfig, OptimizationResult};

const DELIVERY_COUNT: usize = 40;
const VEHICLE_COUNT: usize = 5;
const SEED: u64 = 64;
const HISTORY_CSV: &str = "fitness_history.csv";
const RESULT_JSON: &str = "result.json";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE))
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    println!(
        "{} {}",
        "Fleet route demo run at".bold(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let (deliveries, vehicles, depot) = generate_instance(DELIVERY_COUNT, VEHICLE_COUNT, SEED);
    let provider = fleetroute::HaversineDistance;
    let config = OptimizationConfig {
        seed: SEED,
        ..Default::default()
    };

    info!("Running greedy baseline");
    let baseline = solve_greedy(&deliveries, &vehicles, depot, &provider, &config.weights)?;

    info!("Running genetic optimization");
    let result = optimize(&deliveries, &vehicles, depot, &provider, &config)?;

    print_summary(&baseline, &result);

    save_history_csv(&result.best_fitness_history, HISTORY_CSV)?;
    fs::write(RESULT_JSON, serde_json::to_string_pretty(&result)?)?;
    println!(
        "\nWrote {} and {}",
        HISTORY_CSV.underline(),
        RESULT_JSON.underline()
    );

    Ok(())
}

fn print_summary(baseline: &OptimizationResult, result: &OptimizationResult) {
    println!("\n{}", "=== Optimization summary ===".bold());
    println!(
        "Greedy baseline fitness: {:.2} | GA fitness: {:.2} ({} generations, {:.2}s)",
        baseline.fitness.total,
        result.fitness.total,
        result.generations_run,
        result.elapsed_seconds
    );
    let improvement = if baseline.fitness.total > 0.0 {
        (baseline.fitness.total - result.fitness.total) / baseline.fitness.total * 100.0
    } else {
        0.0
    };
    println!("Improvement over baseline: {:.1}%", improvement);
    println!(
        "Total distance: {:.1} km | total cost: {:.2}",
        result.total_distance, result.total_cost
    );

    for route in &result.routes {
        println!(
            "  {}  {:>6.1} km  {:>6.0} kg  [{}]",
            route.vehicle_id.cyan(),
            route.distance_km,
            route.load,
            route.stops.join(" -> ")
        );
    }

    let violations = &result.residual_violations;
    if violations.is_clean() {
        println!("{}", "All constraints satisfied".green());
    } else {
        println!(
            "{} capacity excess {:.1} kg, range excess {:.1} km, late critical stops {}",
            "Residual violations:".yellow().bold(),
            violations.capacity_excess,
            violations.autonomy_excess,
            violations.late_critical
        );
    }
}

fn save_history_csv(history: &[f64], path: &str) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["generation", "best_fitness"])?;
    for (generation, fitness) in history.iter().enumerate() {
        writer.write_record([(generation + 1).to_string(), fitness.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
