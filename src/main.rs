use clap::Parser;
use routecraft::geocode::{CoordinateResolver, RegionBase};
use routecraft::optimizer::{DeliveryPoint, Optimizer};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Routecraft v0.3, delivery route optimization engine
///
/// Resolves delivery addresses to coordinates (Nominatim, with a
/// deterministic synthetic fallback) and orders them into a driving tour
/// with distance, duration, and carbon estimates.
///
/// Examples:
///   routecraft points.json
///   routecraft points.json --offline
///   routecraft points.json --base-lat 59.3293 --base-lon 18.0686
///   routecraft --serve --port 8000
#[derive(Parser)]
#[command(name = "routecraft", version, about, long_about = None)]
struct Cli {
    /// JSON file with the delivery points: either a bare array of
    /// {"name", "address", "latitude"?, "longitude"?} objects or an
    /// object with a "points" array. Reads stdin when omitted.
    points: Option<PathBuf>,

    /// Offline mode: skip Nominatim, resolve everything synthetically.
    #[arg(long)]
    offline: bool,

    /// Region base latitude for the synthetic fallback.
    #[arg(long, allow_hyphen_values = true)]
    base_lat: Option<f64>,

    /// Region base longitude for the synthetic fallback.
    #[arg(long, allow_hyphen_values = true)]
    base_lon: Option<f64>,

    /// Timeout for a single geocoding lookup, in seconds.
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Start the HTTP API instead of optimizing a file.
    #[arg(long)]
    serve: bool,

    /// Bind host for --serve.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Bind port for --serve.
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

fn main() {
    let cli = Cli::parse();

    // ── Build the resolver ──────────────────────────────────────

    let default_base = RegionBase::default();
    let base = RegionBase {
        lat: cli.base_lat.unwrap_or(default_base.lat),
        lon: cli.base_lon.unwrap_or(default_base.lon),
    };

    let mut resolver = CoordinateResolver::with_base(base)
        .with_timeout(Duration::from_secs(cli.timeout));
    if cli.offline {
        resolver.set_offline(true);
    }

    // ── Serve mode ──────────────────────────────────────────────

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start runtime: {}", e);
            std::process::exit(1);
        });
        runtime.block_on(routecraft::server::start(&cli.host, cli.port, resolver));
        return;
    }

    // ── One-shot optimization ───────────────────────────────────

    let points = read_points(cli.points.as_deref());

    let mut optimizer = Optimizer::with_resolver(resolver);
    let route = optimizer.optimize(&points).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // JSON to stdout, progress already went to stderr
    println!("{}", serde_json::to_string_pretty(&route).unwrap());
}

fn read_points(path: Option<&Path>) -> Vec<DeliveryPoint> {
    let data = match path {
        Some(p) => std::fs::read_to_string(p).unwrap_or_else(|e| {
            eprintln!("Error: Cannot read '{}': {}", p.display(), e);
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("Error: Cannot read stdin: {}", e);
                std::process::exit(1);
            });
            buf
        }
    };

    parse_points(&data).unwrap_or_else(|e| {
        eprintln!("Error: Invalid points JSON: {}", e);
        std::process::exit(1);
    })
}

/// Accepts either a bare JSON array of points or {"points": [...]}, the
/// shape the HTTP endpoint takes.
fn parse_points(data: &str) -> Result<Vec<DeliveryPoint>, serde_json::Error> {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        points: Vec<DeliveryPoint>,
    }

    serde_json::from_str::<Vec<DeliveryPoint>>(data)
        .or_else(|_| serde_json::from_str::<Wrapper>(data).map(|w| w.points))
}
