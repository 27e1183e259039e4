use std::path::PathBuf;

use vansetu::{CorridorConfig, GeometryKind};

/// Priority corridor aggregation CLI
#[derive(clap::Parser, Debug)]
#[command(name = "vansetu", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Aggregate records into corridors and write a GeoJSON FeatureCollection
    Aggregate(AggregateArgs),

    /// Aggregate records and print summary statistics as JSON
    Summary(AggregateArgs),
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Road segments (LineString records)
    Segments,
    /// Point samples
    Points,
}

impl From<Mode> for GeometryKind {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Segments => GeometryKind::Segment,
            Mode::Points => GeometryKind::Point,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct AggregateArgs {
    /// Input GeoJSON FeatureCollection of priority records
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub records: PathBuf,

    /// Geometry kind of the records
    #[arg(short, long, value_enum, default_value_t = Mode::Segments)]
    pub mode: Mode,

    /// JSON configuration file; flags below override its values
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Minimum priority score for a record to be eligible
    #[arg(long)]
    pub priority_threshold: Option<f64>,

    /// Minimum corridor length in meters (segments)
    #[arg(long)]
    pub min_length: Option<f64>,

    /// Maximum distance between adjacent points in meters (points)
    #[arg(long)]
    pub d_max: Option<f64>,

    /// Minimum number of points per corridor (points)
    #[arg(long)]
    pub n_min: Option<usize>,

    /// Endpoint distance at which segments still connect, in meters
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Leave mean_aqi unset
    #[arg(long)]
    pub no_aqi: bool,

    /// Attach corridor type, severity and interventions
    #[arg(long)]
    pub classify: bool,

    /// Output file, defaults to stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

impl AggregateArgs {
    /// Configuration from the optional file, overridden by flags.
    pub fn corridor_config(&self) -> anyhow::Result<CorridorConfig> {
        let mut config = match &self.config {
            Some(path) => CorridorConfig::from_json_file(path)?,
            None => CorridorConfig::default(),
        };

        if let Some(v) = self.priority_threshold { config.priority_threshold = v }
        if let Some(v) = self.min_length { config.min_length_m = v }
        if let Some(v) = self.d_max { config.d_max = v }
        if let Some(v) = self.n_min { config.n_min = v }
        if let Some(v) = self.tolerance { config.adjacency_tolerance = v }
        if self.no_aqi { config.include_aqi = false }

        Ok(config)
    }
}
