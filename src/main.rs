use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand, ValueEnum};
use tour_book::{
    data_types::tour::TourData,
    error::Result,
    logln,
    processors::segmenter::SegmenterType,
    util::{
        config::Config,
        geo::GeoUtils,
        logging::{self, LogLevel},
        time::Benchmark,
        DateTimeUtils,
    },
    TourAnalysis, TourBook,
};

#[derive(Parser)]
#[command(name = "tour-book", version, about = "Analyzes recorded tours")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// No log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose log output of one component, e.g. `Segmenter`
    #[arg(long = "log", value_name = "COMPONENT", global = true)]
    log_components: Vec<String>,

    /// No log output of one component
    #[arg(long = "mute", value_name = "COMPONENT", global = true)]
    muted_components: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Elevation gain/loss and segments of a tour
    Analyze {
        /// Tour JSON file
        tour: PathBuf,

        #[arg(long, value_enum, default_value_t = Segmenter::DouglasPeucker)]
        segmenter: Segmenter,

        /// Interval in meters, tolerance or minimum altitude difference of the segmenter
        #[arg(long)]
        value: Option<f32>,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Normalized geo track of a tour as an encoded polyline
    Normalize {
        /// Tour JSON file
        tour: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Segmenter {
    Distance,
    DouglasPeucker,
    MinAltitudeDiff,
}

struct Cmd {
    book: TourBook,
}

impl Cmd {
    const CC: &str = "CLI";

    fn segmenter_type(&self, segmenter: Segmenter, value: Option<f32>) -> SegmenterType {
        let elevation = &self.book.config().elevation;

        match segmenter {
            Segmenter::Distance => SegmenterType::ByDistance {
                interval: value.unwrap_or(1000.),
            },
            Segmenter::DouglasPeucker => SegmenterType::ByDouglasPeucker {
                tolerance: value.unwrap_or(elevation.dp_tolerance),
            },
            Segmenter::MinAltitudeDiff => SegmenterType::ByMinAltitudeDiff {
                min_diff: value.unwrap_or(elevation.min_altitude_diff),
            },
        }
    }

    fn load(&self, path: &Path) -> Result<TourData> {
        let _benchmark = Benchmark::start("Load tour");
        let tour = TourBook::load_tour(path)?;

        logln!(
            "{}: {} slices, started {}",
            path.display(),
            tour.num_slices(),
            DateTimeUtils::millis_to_str(tour.tour_start_time)
        );

        Ok(tour)
    }

    fn analyze(
        &self,
        path: &Path,
        segmenter: Segmenter,
        value: Option<f32>,
        json: bool,
    ) -> Result<()> {
        let tour = self.load(path)?;

        let analysis = {
            let _benchmark = Benchmark::start("Analyze");
            self.book
                .analyze(&tour, self.segmenter_type(segmenter, value))?
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        } else {
            Self::print_analysis(&analysis);
        }

        Ok(())
    }

    fn print_analysis(analysis: &TourAnalysis) {
        if let Some(elevation) = analysis.elevation {
            println!("Elevation   +{:.0} m  -{:.0} m", elevation.gain, elevation.loss);
        }

        if let Some(buckets) = analysis.flat_gain_loss {
            println!(
                "Flat        {}  {:.2} km",
                DateTimeUtils::duration_to_str(buckets.time_flat),
                buckets.distance_flat / 1000.
            );
            println!(
                "Uphill      {}  {:.2} km",
                DateTimeUtils::duration_to_str(buckets.time_gain),
                buckets.distance_gain / 1000.
            );
            println!(
                "Downhill    {}  {:.2} km",
                DateTimeUtils::duration_to_str(buckets.time_loss),
                buckets.distance_loss / 1000.
            );
        }

        if !analysis.segments.is_empty() {
            println!();
            println!(
                "{:>6} {:>6} {:>9} {:>9} {:>8} {:>7} {:>7} {:>6}",
                "start", "end", "moving", "km", "km/h", "up", "down", "%"
            );
        }

        for segment in &analysis.segments {
            let (start, end) = if segment.is_total {
                ("total".to_string(), String::new())
            } else {
                (
                    segment.serie_index_start.to_string(),
                    segment.serie_index_end.to_string(),
                )
            };

            println!(
                "{:>6} {:>6} {:>9} {:>9.2} {:>8.1} {:>7.0} {:>7.0} {:>6.1}",
                start,
                end,
                DateTimeUtils::duration_to_str(segment.time_moving as i64),
                segment.distance_diff / 1000.,
                segment.speed,
                segment.altitude_segment_up,
                segment.altitude_segment_down,
                segment.gradient
            );
        }

        for (id, statistic) in &analysis.custom_tracks {
            let label = match analysis.custom_track_definitions.get(id) {
                Some(definition) => format!("{} [{}]", definition.name, definition.unit),
                None => id.clone(),
            };

            println!(
                "{label}: avg {:.1} min {:.1} max {:.1}",
                statistic.avg, statistic.min, statistic.max
            );
        }

        if let Some(swim) = &analysis.swim {
            println!("Swim: {} active of {} lengths", swim.active_lengths(), swim.len());
        }
    }

    fn normalize(&self, path: &Path) -> Result<()> {
        let tour = self.load(path)?;
        let geo = self.book.normalize(&tour)?;

        let coords = geo.coords();
        if let Some((south_west, north_east)) = GeoUtils::bounding_box(&coords) {
            let center = GeoUtils::center_of_bbox(south_west, north_east);
            logln!("{} points around {:.5}, {:.5}", geo.len(), center.y, center.x);
        }

        match geo.to_polyline() {
            Ok(polyline) => println!("{polyline}"),
            Err(err) => eprintln!("Polyline encoding failed: {err}"),
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        logging::set_global_level(LogLevel::VERBOSE);
    }
    if cli.quiet {
        logging::set_global_logging(false);
    }
    for component in &cli.log_components {
        logging::enable_cc(component, LogLevel::VERBOSE);
    }
    for component in &cli.muted_components {
        logging::disable_cc(component);
    }

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Cannot load {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let cmd = Cmd {
        book: TourBook::in_memory(config),
    };

    let result = match &cli.command {
        Command::Analyze {
            tour,
            segmenter,
            value,
            json,
        } => cmd.analyze(tour, *segmenter, *value, *json),
        Command::Normalize { tour } => cmd.normalize(tour),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
