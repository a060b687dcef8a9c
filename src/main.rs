use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tft_match_pipeline::collect::{CollectArgs, collect_matches};
use tft_match_pipeline::config::ApiConfig;
use tft_match_pipeline::preprocess::preprocess;
use tft_match_pipeline::riot_api::RiotClient;

#[derive(Parser, Debug)]
#[command(
    name = "tft-match-pipeline",
    about = "Download TFT matches from the Riot API and flatten them into a CSV dataset",
    version
)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and save TFT match data for a Riot ID
    Collect {
        /// Riot game name
        game_name: String,

        /// Riot tag line
        tag_line: String,

        /// Starting index for match retrieval
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Number of matches to retrieve
        #[arg(long, default_value_t = 20)]
        count: usize,

        /// Directory to save match data in
        #[arg(long = "save_path", visible_alias = "save-path", default_value = "data/raw/")]
        save_path: PathBuf,

        /// Routing region (americas, europe, asia, sea); defaults to RIOT_REGION or americas
        #[arg(long)]
        region: Option<String>,
    },
    /// Flatten saved match files into a single CSV
    Preprocess {
        /// Directory holding the raw match JSON files
        #[arg(long = "raw_data_path", visible_alias = "raw-data-path", default_value = "data/raw/")]
        raw_data_path: PathBuf,

        /// Directory to write tft_match_data.csv into
        #[arg(
            long = "processed_data_path",
            visible_alias = "processed-data-path",
            default_value = "data/processed/"
        )]
        processed_data_path: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Collect {
            game_name,
            tag_line,
            start,
            count,
            save_path,
            region,
        } => {
            let config = ApiConfig::from_env(region.as_deref())?;
            let client = RiotClient::new(&config)?;
            let args = CollectArgs {
                game_name,
                tag_line,
                start,
                count,
                save_path,
            };

            let summary = collect_matches(&client, &args)?;
            info!(
                puuid = %summary.puuid,
                saved = summary.written.len(),
                dir = %args.save_path.display(),
                "collection finished"
            );
        }
        Command::Preprocess {
            raw_data_path,
            processed_data_path,
        } => {
            let summary = preprocess(&raw_data_path, &processed_data_path)?;
            println!("{}", summary.output.display());
        }
    }

    Ok(())
}

fn main() {
    dotenv::dotenv().ok();

    let args = Cli::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(args.command) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
