//! Floor plan generator
//!
//! Main entry point for the command-line tool.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dg_core::{Floor, GeneratorConfig, MapRng};
use dg_template::{GeneratorKind, export_floor, load_map};

/// Generate a floor of rooms and doors
#[derive(Parser, Debug)]
#[command(name = "dungen")]
#[command(author, version, about = "Generate a floor of rooms and doors", long_about = None)]
struct Args {
    /// Map template directory (def.json plus cell*.json)
    #[arg(short = 'm', long = "map")]
    map: Option<PathBuf>,

    /// Seed (random when omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Generation attempts before giving up
    #[arg(short = 'n', long = "attempts")]
    attempts: Option<u32>,

    /// Write the floor as JSON to this file
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print a text picture of the floor
    #[arg(short = 'd', long = "draw")]
    draw: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "dungen=debug,dg_core=debug,dg_template=debug"
    } else {
        "dungen=info,dg_core=info,dg_template=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (name, kind, mut config) = match &args.map {
        Some(dir) => {
            let template = load_map(dir)
                .with_context(|| format!("loading map template from {}", dir.display()))?;
            let config = template.to_config()?;
            (template.name.clone(), template.kind()?, config)
        }
        None => (
            "default".to_string(),
            GeneratorKind::Room,
            GeneratorConfig::default(),
        ),
    };
    if let Some(attempts) = args.attempts {
        config = config.with_max_attempts(attempts);
        config.validate()?;
    }

    let seed = args.seed.unwrap_or_else(|| MapRng::from_entropy().seed());
    tracing::info!(map = %name, seed, "generating floor");
    let floor = kind
        .generate(&config, seed)
        .with_context(|| format!("generating floor from map {name} with seed {seed}"))?;

    println!("{}", summary(&name, &floor));
    if args.draw {
        print!("{}", floor.to_ascii());
    }

    if let Some(path) = &args.output {
        export_floor(&floor, &name, path)
            .with_context(|| format!("writing floor to {}", path.display()))?;
        tracing::info!("wrote floor to {}", path.display());
    }

    Ok(())
}

/// One-screen description of a floor
fn summary(map: &str, floor: &Floor) -> String {
    let covered: u32 = floor.cells.iter().map(|c| c.size().area()).sum();
    let start = &floor.cells[floor.start];
    let end = &floor.cells[floor.end];
    [
        format!("map:         {map}"),
        format!("grid:        {}x{}", floor.width, floor.height),
        format!("seed:        {}", floor.seed),
        format!(
            "rooms:       {} ({} of {} units)",
            floor.cells.len(),
            covered,
            floor.width * floor.height
        ),
        format!("start:       {}x{} at ({}, {})", start.width, start.height, start.x, start.y),
        format!("end:         {}x{} at ({}, {})", end.width, end.height, end.x, end.y),
        format!("path length: {}", floor.path.len()),
        format!("extra links: {}", floor.extra_links.len()),
        format!("doors:       {}", floor.door_count()),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "dungen", "--map", "data/maps/dungeon", "-s", "42", "-n", "3", "-d",
        ])
        .unwrap();
        assert_eq!(args.map, Some(PathBuf::from("data/maps/dungeon")));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.attempts, Some(3));
        assert!(args.draw);
        assert!(!args.verbose);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_args_reject_bad_seed() {
        assert!(Args::try_parse_from(["dungen", "--seed", "abc"]).is_err());
    }

    #[test]
    fn test_summary() {
        let floor = dg_core::generate(&GeneratorConfig::default(), 7).unwrap();
        let text = summary("default", &floor);
        assert!(text.starts_with("map:         default"));
        assert!(text.contains(&format!("seed:        {}", floor.seed)));
        assert!(text.contains(&format!("path length: {}", floor.path.len())));
        assert_eq!(text.lines().count(), 9);
    }
}
