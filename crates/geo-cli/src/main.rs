//! CLI binary: geocode place names to CSV, then build a GraphML location graph.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use geo_core::config::{GeoConfig, MissingTypePolicy};
use geo_loader::{DEFAULT_LOCATIONS, LoadOptions, LoadProgress, NominatimGeocoder};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "geo-pipeline", about = "Geocode places and build a location graph")]
struct Cli {
    /// Config file (defaults to ./geo.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Geocoded CSV table path
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Geocode place names and write the CSV table
    Load(LoadArgs),

    /// Build the location graph from the CSV table and write GraphML
    Build {
        /// GraphML output path
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },

    /// Run `load` then `build`
    Run {
        #[command(flatten)]
        load: LoadArgs,

        /// GraphML output path
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },

    /// Show statistics for the graph built from the CSV table
    Info,
}

#[derive(Args)]
struct LoadArgs {
    /// Place names to geocode (defaults to the built-in list)
    locations: Vec<String>,

    /// Read place names from a file, one per line
    #[arg(short, long, conflicts_with = "locations")]
    file: Option<PathBuf>,

    /// Per-lookup timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// User-Agent sent to the geocoding service
    #[arg(long)]
    user_agent: Option<String>,

    /// Base URL of the Nominatim-compatible service
    #[arg(long)]
    endpoint: Option<String>,

    /// Record matches without a place type as missing instead of aborting
    #[arg(long)]
    degrade_missing_type: bool,

    /// Disable the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(csv) = &cli.csv {
        config.paths.csv = csv.clone();
    }
    tracing::debug!(
        "table: {}, graph: {}",
        config.paths.csv.display(),
        config.paths.graph.display()
    );

    match cli.command {
        Commands::Load(args) => cmd_load(&mut config, &args),
        Commands::Build { graph } => cmd_build(&mut config, graph),
        Commands::Run { load, graph } => {
            cmd_load(&mut config, &load)?;
            cmd_build(&mut config, graph)
        }
        Commands::Info => cmd_info(&config),
    }
}

fn load_config(path: Option<&Path>) -> Result<GeoConfig> {
    match path {
        Some(p) => GeoConfig::load_file(p)
            .with_context(|| format!("failed to load config from {}", p.display())),
        None => {
            let cwd = std::env::current_dir().context("failed to get current directory")?;
            GeoConfig::load(&cwd).context("failed to load geo.toml")
        }
    }
}

/// Apply `load` flags on top of the loaded config.
fn apply_load_args(config: &mut GeoConfig, args: &LoadArgs) -> Result<()> {
    if let Some(timeout) = args.timeout {
        config.geocoder.timeout_secs = timeout;
    }
    if let Some(agent) = &args.user_agent {
        config.geocoder.user_agent = agent.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        config.geocoder.endpoint = endpoint.clone();
    }
    if args.degrade_missing_type {
        config.geocoder.missing_type = MissingTypePolicy::Degrade;
    }
    config.validate()
}

/// Resolve the list of place names: file, positional args, or the defaults.
fn resolve_locations(args: &LoadArgs) -> Result<Vec<String>> {
    if let Some(file) = &args.file {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read locations from {}", file.display()))?;
        return Ok(parse_locations(&content));
    }
    if args.locations.is_empty() {
        return Ok(DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect());
    }
    Ok(args.locations.clone())
}

/// One place name per line; blank lines and `#` comments are skipped.
fn parse_locations(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

fn cmd_load(config: &mut GeoConfig, args: &LoadArgs) -> Result<()> {
    apply_load_args(config, args)?;
    let locations = resolve_locations(args)?;

    let geocoder = NominatimGeocoder::from_config(&config.geocoder);
    let options = LoadOptions::from_config(config);
    let progress = if args.quiet {
        LoadProgress::hidden(locations.len() as u64)
    } else {
        LoadProgress::new(locations.len() as u64)
    };

    let table = geo_loader::load_and_save(
        locations.as_slice(),
        &geocoder,
        &options,
        &config.paths.csv,
        Some(&progress),
    )
    .with_context(|| format!("geocoding {} location(s) failed", locations.len()))?;

    for record in &table {
        match (record.coordinates(), record.kind.as_deref()) {
            (Some((lat, lon)), kind) => println!(
                "{:<40} {:>12.6} {:>12.6}  {}",
                record.location,
                lat,
                lon,
                kind.unwrap_or("-")
            ),
            (None, _) => println!("{:<40} {:>12} {:>12}  -", record.location, "NA", "NA"),
        }
    }
    Ok(())
}

fn cmd_build(config: &mut GeoConfig, graph: Option<PathBuf>) -> Result<()> {
    if let Some(graph) = graph {
        config.paths.graph = graph;
    }
    geo_graph::build_and_save_graph(&config.paths.csv, &config.paths.graph).with_context(|| {
        format!(
            "failed to build graph from {}",
            config.paths.csv.display()
        )
    })?;
    Ok(())
}

fn cmd_info(config: &GeoConfig) -> Result<()> {
    if !config.paths.csv.exists() {
        eprintln!(
            "No table found at {}. Run `geo-pipeline load` first.",
            config.paths.csv.display()
        );
        return Ok(());
    }

    let table = geo_core::table::load(&config.paths.csv)?;
    let graph = geo_graph::build_graph(&table);
    let stats = graph.stats();

    println!("Rows: {}", table.len());
    println!("Resolved: {}/{}", table.resolved_count(), table.len());
    println!("Nodes: {}", stats.nodes);
    println!("Same-type edges: {}", stats.same_type_edges);
    println!("Arbitrary edges: {}", stats.arbitrary_edges);
    if !stats.types.is_empty() {
        println!("\nTypes:");
        for (kind, count) in &stats.types {
            println!("  {} ({} nodes)", kind, count);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_args(locations: &[&str]) -> LoadArgs {
        LoadArgs {
            locations: locations.iter().map(|s| s.to_string()).collect(),
            file: None,
            timeout: None,
            user_agent: None,
            endpoint: None,
            degrade_missing_type: false,
            quiet: true,
        }
    }

    #[test]
    fn test_parse_locations_skips_blanks_and_comments() {
        let parsed = parse_locations("Alaska\n\n# landmarks\n  Burj Khalifa  \n");
        assert_eq!(parsed, vec!["Alaska", "Burj Khalifa"]);
    }

    #[test]
    fn test_resolve_locations_defaults() {
        let locations = resolve_locations(&load_args(&[])).unwrap();
        assert_eq!(locations.len(), DEFAULT_LOCATIONS.len());
        assert_eq!(locations[0], "Museum of Modern Art");
    }

    #[test]
    fn test_resolve_locations_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("places.txt");
        std::fs::write(&path, "Alaska\nAlaska\n").unwrap();

        let mut args = load_args(&[]);
        args.file = Some(path);
        assert_eq!(resolve_locations(&args).unwrap(), vec!["Alaska", "Alaska"]);
    }

    #[test]
    fn test_apply_load_args_overrides_config() {
        let mut config = GeoConfig::default();
        let mut args = load_args(&["Alaska"]);
        args.timeout = Some(4);
        args.user_agent = Some("tester".to_string());
        args.degrade_missing_type = true;

        apply_load_args(&mut config, &args).unwrap();
        assert_eq!(config.geocoder.timeout_secs, 4);
        assert_eq!(config.geocoder.user_agent, "tester");
        assert_eq!(config.geocoder.missing_type, MissingTypePolicy::Degrade);
    }

    #[test]
    fn test_apply_load_args_rejects_zero_timeout() {
        let mut config = GeoConfig::default();
        let mut args = load_args(&[]);
        args.timeout = Some(0);
        assert!(apply_load_args(&mut config, &args).is_err());
    }

    #[test]
    fn test_cli_parses_run_command() {
        let cli = Cli::try_parse_from([
            "geo-pipeline",
            "--csv",
            "out.csv",
            "run",
            "Alaska",
            "--graph",
            "g.graphml",
        ])
        .unwrap();
        assert_eq!(cli.csv, Some(PathBuf::from("out.csv")));
        match cli.command {
            Commands::Run { load, graph } => {
                assert_eq!(load.locations, vec!["Alaska"]);
                assert_eq!(graph, Some(PathBuf::from("g.graphml")));
            }
            _ => panic!("expected run"),
        }
    }
}
