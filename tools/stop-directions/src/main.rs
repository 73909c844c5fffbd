use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geo::Point;
use headsign_transit::direction::config::{
    DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON, DEFAULT_MAX_DISTANCE_M, DEFAULT_MIN_DISTANCE_M,
};
use headsign_transit::prelude::*;
use std::path::PathBuf;

mod catalog;
mod output;

use catalog::{load_stops, InputFormat};
use output::{directions_to_geojson, open_output, write_json, NearbyStop};

#[derive(Parser, Debug)]
#[command(
    name = "stop-directions",
    author,
    version,
    about = "Infer the next stop and travel direction for every line serving a stop",
    long_about = "Reads a stop catalog (stopsInExtent XML or its JSON rendition), groups stops \
                  by line and head sign, and pairs every stop with its nearest same-direction \
                  neighbor. Each pair is labeled with a compass sector and whether it heads \
                  toward, away from, or along the configured city center."
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute direction records for every stop
    Directions(DirectionsArgs),
    /// List the stops closest to a location
    Nearest(NearestArgs),
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Stop catalog file
    #[arg(short, long)]
    input: PathBuf,

    /// Input format (detected from the extension by default)
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Output file (stdout by default)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct DirectionsArgs {
    #[command(flatten)]
    io: InputArgs,

    /// Write a GeoJSON FeatureCollection of stop -> neighbor lines instead of JSON records
    #[arg(long)]
    geojson: bool,

    /// Latitude of the reference center
    #[arg(long, default_value_t = DEFAULT_CENTER_LAT, allow_negative_numbers = true)]
    center_lat: f64,

    /// Longitude of the reference center
    #[arg(long, default_value_t = DEFAULT_CENTER_LON, allow_negative_numbers = true)]
    center_lon: f64,

    /// Neighbors at or below this distance (meters) are ignored
    #[arg(long, default_value_t = DEFAULT_MIN_DISTANCE_M)]
    min_distance: f64,

    /// Neighbors beyond this distance (meters) are ignored
    #[arg(long, default_value_t = DEFAULT_MAX_DISTANCE_M)]
    max_distance: f64,
}

#[derive(clap::Args, Debug)]
struct NearestArgs {
    #[command(flatten)]
    io: InputArgs,

    /// Latitude of the query location
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude of the query location
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Search radius in meters (unbounded by default)
    #[arg(long)]
    radius: Option<f64>,

    /// Maximum number of stops to list
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

fn load_catalog(io: &InputArgs) -> Result<StopCatalog> {
    log::info!("Input: {}", io.input.display());

    let stops = load_stops(&io.input, io.format)
        .with_context(|| format!("Failed to load stops from {}", io.input.display()))?;
    let catalog = StopCatalog::from_stops(stops);

    log::info!("Loaded {} stops", catalog.len());
    Ok(catalog)
}

fn run_directions(args: &DirectionsArgs) -> Result<()> {
    let config = DirectionConfig::new(
        args.min_distance,
        args.max_distance,
        Point::new(args.center_lon, args.center_lat),
    )
    .context("Invalid direction settings")?;

    let catalog = load_catalog(&args.io)?;
    let directions = catalog.directions(&config);

    let record_count: usize = directions.values().map(Vec::len).sum();
    log::info!(
        "Inferred {} direction records for {} of {} stops",
        record_count,
        directions.len(),
        catalog.len()
    );

    let writer = open_output(args.io.output.as_deref())?;
    if args.geojson {
        let geojson = directions_to_geojson(&directions, &catalog)?;
        write_json(&geojson, writer)?;
    } else {
        write_json(&directions, writer)?;
    }

    Ok(())
}

fn run_nearest(args: &NearestArgs) -> Result<()> {
    let catalog = load_catalog(&args.io)?;
    let point = Point::new(args.lon, args.lat);

    let nearest: Vec<_> = catalog
        .nearest_stops(point, args.radius, args.limit)
        .iter()
        .map(|(stop, distance)| NearbyStop::new(stop, *distance))
        .collect();

    if nearest.is_empty() {
        match args.radius {
            Some(radius) => log::warn!("No stops within {} m of {}, {}", radius, args.lat, args.lon),
            None => log::warn!("Catalog has no stops"),
        }
    }

    write_json(&nearest, open_output(args.io.output.as_deref())?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    match &args.command {
        Command::Directions(directions) => run_directions(directions),
        Command::Nearest(nearest) => run_nearest(nearest),
    }
}
