use clap::{Parser, Subcommand};
use promotion_predictor::{
    config::Config,
    error::Result,
    ml::{ArtifactStore, CategoricalField, InferencePipeline},
    models::RawAttributes,
};
use std::process::ExitCode;
use validator::Validate;

#[derive(Parser)]
#[command(name = "promotion-cli")]
#[command(about = "Promotion likelihood predictor CLI", long_about = None)]
struct Cli {
    /// Configuration file layered over the built-in defaults
    #[arg(short, long, env = "CONFIG_PATH", default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict promotion likelihood for one employee
    Predict {
        #[arg(long)]
        department: String,

        #[arg(long)]
        education: String,

        #[arg(long)]
        gender: String,

        #[arg(long)]
        recruitment_channel: String,

        #[arg(long, default_value = "30")]
        age: u32,

        #[arg(long, default_value = "75")]
        avg_training_score: u32,

        #[arg(long, default_value = "1")]
        no_of_trainings: u32,

        #[arg(long, default_value = "3.0")]
        previous_year_rating: f64,

        #[arg(long, default_value = "5")]
        length_of_service: u32,

        /// KPIs met above 80%
        #[arg(long)]
        kpis_met: bool,

        #[arg(long)]
        awards_won: bool,
    },

    /// Show department and education encodings
    Encodings,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_from(&cli.config)?;
    let store = ArtifactStore::new(config.artifacts.paths());
    let pipeline = InferencePipeline::new(store.load()?);

    match cli.command {
        Commands::Predict {
            department,
            education,
            gender,
            recruitment_channel,
            age,
            avg_training_score,
            no_of_trainings,
            previous_year_rating,
            length_of_service,
            kpis_met,
            awards_won,
        } => {
            let raw = RawAttributes {
                department,
                education,
                gender,
                recruitment_channel,
                age,
                avg_training_score,
                no_of_trainings,
                previous_year_rating,
                length_of_service,
                kpis_met,
                awards_won,
            };
            raw.validate()?;

            let verdict = pipeline.predict(&raw)?;
            println!("{}", verdict.headline());
        }

        Commands::Encodings => {
            for (title, field) in [
                ("Department Encodings", CategoricalField::Department),
                ("Education Encodings", CategoricalField::Education),
            ] {
                println!("{}:", title);
                for entry in pipeline.encodings(field) {
                    match entry.code {
                        Some(code) => println!("  {:<20} {}", entry.label, code),
                        None => println!("  {:<20} -", entry.label),
                    }
                }
            }
        }
    }

    Ok(())
}
