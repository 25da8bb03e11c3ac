use std::path::PathBuf;

use clap::Parser;
use panel_prep::input::{load_job, load_placements};
use panel_prep::pipeline::{Pipeline, PrepareOptions, TracingObserver, apply_placements, markings};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "panel_prep",
    about = "Prepare cabinet panels for the cut-list optimizer"
)]
struct Cli {
    /// Job file: {"panels": [...], "woodGrains": {...}, "laminates": [...]}
    #[arg(long)]
    job: PathBuf,

    /// Optimizer placements as [{"id", "w", "h"}]; prints edge markings
    #[arg(long)]
    placements: Option<PathBuf>,

    /// Write display dimensions back into the panels in the JSON output
    #[arg(long)]
    backfill: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut job = load_job(&cli.job).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let grain = job.grain_preferences();

    let mut parts = Pipeline::new(&grain)
        .with_observer(&TracingObserver)
        .with_options(PrepareOptions {
            backfill_display: cli.backfill,
        })
        .prepare_mut(&mut job.panels);

    if let Some(path) = &cli.placements {
        let placements = load_placements(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
        let unmatched = apply_placements(&mut parts, &placements);
        if !unmatched.is_empty() {
            eprintln!("Warning: {} placement(s) matched no part", unmatched.len());
        }
    }

    let marks = markings(&parts);

    if cli.json {
        let panels = cli.backfill.then_some(&job.panels);
        let output = serde_json::json!({
            "parts": parts,
            "markings": marks
                .iter()
                .map(|(id, m)| serde_json::json!({ "id": id, "marking": m }))
                .collect::<Vec<_>>(),
            "panels": panels,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for p in &parts {
        let rot = if p.rotation_allowed() { "" } else { " [locked]" };
        println!(
            "  {:<24} {:<7} {} -> {}{}",
            p.id(),
            p.role(),
            p.nominal(),
            p.placed(),
            rot
        );
    }

    if cli.placements.is_some() {
        println!();
        for (id, m) in &marks {
            println!(
                "  {:<24} mark {:?} on {:?} axis",
                id, m.mark_dimension, m.sheet_axis
            );
        }
    }

    let locked = parts.iter().filter(|p| !p.rotation_allowed()).count();
    println!();
    println!(
        "Summary: {} part{}, {} grain-locked, {} marked",
        parts.len(),
        if parts.len() == 1 { "" } else { "s" },
        locked,
        marks.len(),
    );
}
