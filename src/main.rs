//! Resume scorer: extraction and explainable job-match scoring

use clap::Parser;
use log::error;
use resume_scorer::cli::{Cli, Commands};
use resume_scorer::reader::RawDocument;
use resume_scorer::scoring::JobRequirement;
use resume_scorer::{Config, Pipeline, Result};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    dotenvy::dotenv().ok();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    let pipeline = Pipeline::new(&config);

    match command {
        Commands::Extract { resume, media_type } => {
            let document = load_document(&resume, media_type).await?;
            let text = pipeline.ingest(document).await?;
            let profile = pipeline.extract(&text).await.into_profile();
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Commands::Score {
            resume,
            job,
            media_type,
        } => {
            let document = load_document(&resume, media_type).await?;
            let requirement = load_requirement(&pipeline, &job).await?;
            let evaluation = pipeline.evaluate(document, &requirement).await?;
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        }
    }

    Ok(())
}

async fn load_document(path: &Path, media_type: Option<String>) -> Result<RawDocument> {
    let bytes = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    let mut document = RawDocument::new(bytes, filename);
    if let Some(media_type) = media_type {
        document = document.with_media_type(media_type);
    }
    Ok(document)
}

/// A `.json` job file is a structured requirement; anything else is free
/// text run through the requirement extractor.
async fn load_requirement(pipeline: &Pipeline, path: &Path) -> Result<JobRequirement> {
    let content = tokio::fs::read_to_string(path).await?;
    if path.extension().is_some_and(|ext| ext == "json") {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(pipeline.parse_requirement(&content).await)
    }
}
