//! Run with: cargo run -p kensaku-core --example search -- "The Matrix" --year 1999
//!
//! Searches NZBIndex and prints the releases that pass the password filter,
//! enriching the first few with their NFO text.

use clap::{Parser, ValueEnum};
use kensaku_core::{
    AppConfig, HttpNzbIndex, MediaQuery, QualityConstraint, SearchMode, SearchProvider,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Movie,
    Season,
    Episode,
}

#[derive(Debug, Parser)]
struct Args {
    title: String,
    #[arg(long)]
    year: Option<u16>,
    /// Season/episode token such as S01 or S01E02.
    #[arg(long)]
    identifier: Option<String>,
    #[arg(long, value_enum, default_value = "movie")]
    mode: Mode,
    #[arg(long)]
    min_size: Option<u64>,
    #[arg(long)]
    max_size: Option<u64>,
    /// How many results to enrich with NFO text.
    #[arg(long, default_value_t = 3)]
    enrich: usize,
    /// Write the effective config to the user config file before searching.
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("kensaku_core=debug")
        .init();

    let args = Args::parse();
    let media = MediaQuery {
        title: args.title,
        year: args.year,
        identifier: args.identifier,
        mode: match args.mode {
            Mode::Movie => SearchMode::Movie,
            Mode::Season => SearchMode::Season,
            Mode::Episode => SearchMode::Episode,
        },
    };
    let quality = QualityConstraint {
        min_size_mb: args.min_size,
        max_size_mb: args.max_size,
    };

    let config = AppConfig::load()?;
    if args.write_config {
        config.save()?;
        tracing::info!(path = %AppConfig::config_path().display(), "wrote config");
    }

    let provider = HttpNzbIndex::from_config(config.provider)?;
    let mut results = provider.search_and_filter(&media, &quality).await?;

    for result in results.iter_mut().take(args.enrich) {
        provider.enrich(result).await;
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
