use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cybo_water_predictor::{
    read_batch, sample_from_fields, EngineConfig, PredictionReport, Predictor,
};

#[derive(Parser)]
#[command(name = "cybo-water")]
#[command(about = "Arsenic/lead filter performance predictor")]
struct Cli {
    /// Built-in parameter set.
    #[arg(long, global = true, value_enum, default_value_t = PresetCli::Column)]
    preset: PresetCli,
    /// JSON overrides laid over the selected --preset.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, ValueEnum)]
enum PresetCli {
    Column,
    FieldKit,
}

#[derive(Copy, Clone, ValueEnum)]
enum BatchFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one reading and print the JSON report.
    Predict {
        /// Lead, mg/L.
        #[arg(long, default_value = "0")]
        lead: String,
        /// Arsenic, mg/L.
        #[arg(long, default_value = "0")]
        arsenic: String,
        #[arg(long, default_value = "7.5")]
        ph: String,
        /// Turbidity, NTU.
        #[arg(long, default_value = "0")]
        turbidity: String,
        /// Daily flow, L/day.
        #[arg(long, default_value = "0")]
        flow: String,
        /// Media mass, g.
        #[arg(long)]
        media_mass: Option<String>,
        /// Media capacity, mg/g.
        #[arg(long)]
        media_capacity: Option<String>,
        #[arg(long, default_value_t = false)]
        compact: bool,
    },
    /// Evaluate every row of a CSV file.
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = BatchFormat::Csv)]
        format: BatchFormat,
    },
    /// Print the effective engine configuration.
    Config,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<EngineConfig, Box<dyn Error>> {
    let preset = match cli.preset {
        PresetCli::Column => EngineConfig::column_sorption(),
        PresetCli::FieldKit => EngineConfig::field_kit(),
    };
    let cfg = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), model = preset.life.name(), "overlaying engine config");
            preset.overlay_json_file(path)?
        }
        None => preset,
    };
    Ok(cfg)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let predictor = Predictor::new(config)?;

    match &cli.command {
        Commands::Predict {
            lead,
            arsenic,
            ph,
            turbidity,
            flow,
            media_mass,
            media_capacity,
            compact,
        } => {
            let sample = sample_from_fields(
                lead,
                arsenic,
                ph,
                turbidity,
                flow,
                media_mass.as_deref(),
                media_capacity.as_deref(),
            );
            let report = PredictionReport::now(&predictor, sample);
            if *compact {
                println!("{}", report.to_json_line()?);
            } else {
                println!("{}", report.to_json_pretty()?);
            }
        }
        Commands::Batch { input, format } => {
            let rows = read_batch(BufReader::new(File::open(input)?))?;
            if let BatchFormat::Csv = format {
                println!(
                    "sample_id,lead_removal,arsenic_removal,lead_out_mg_l,arsenic_out_mg_l,risk_score,life_days,worst"
                );
            }
            for row in rows {
                match format {
                    BatchFormat::Csv => {
                        let r = predictor.predict(&row.sample);
                        println!(
                            "{},{:.3},{:.3},{:.4},{:.4},{:.3},{:.1},{}",
                            row.sample_id,
                            r.lead_removal,
                            r.arsenic_removal,
                            r.lead_out_mg_l,
                            r.arsenic_out_mg_l,
                            r.risk_score,
                            r.life_days,
                            r.worst_severity().as_str()
                        );
                    }
                    BatchFormat::Json => {
                        let report = PredictionReport::now(&predictor, row.sample)
                            .with_sample_id(row.sample_id);
                        println!("{}", report.to_json_line()?);
                    }
                }
            }
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(predictor.config())?);
        }
    }

    Ok(())
}
