use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use phonolab::features::{extract_dataset, MfccConfig};
use phonolab::{
    create_router, AppState, Config, GentleClient, PocketSphinxRecognizer,
    PronunciationAnalyzer,
};

#[derive(Parser)]
#[command(name = "phonolab", about = "Children's pronunciation analysis service")]
struct Cli {
    /// Config file path, without extension (TOML/YAML/JSON accepted)
    #[arg(long, default_value = "config/phonolab")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP analysis API
    Serve,
    /// Analyze one recording and print the report as JSON
    Analyze {
        /// The sentence the child was asked to say
        transcript: String,
        /// Path to the recording
        audio: PathBuf,
    },
    /// Extract mean-MFCC features for a labeled dataset
    Features {
        /// JSON manifest of {file, label} entries
        manifest: PathBuf,
        /// Directory holding the referenced audio files
        audio_dir: PathBuf,
        /// Output path for the extracted feature set (JSON)
        out: PathBuf,
    },
}

fn build_analyzer(cfg: &Config) -> Result<PronunciationAnalyzer> {
    let aligner = GentleClient::new(
        cfg.gentle.base_url.clone(),
        Duration::from_secs(cfg.gentle.timeout_secs),
    )?;

    // Fails fast when the acoustic model is not installed
    let recognizer = PocketSphinxRecognizer::new(
        cfg.recognizer.model_dir.clone(),
        cfg.recognizer.dict_path.clone(),
        cfg.recognizer.decoder_bin.clone(),
    )?;

    Ok(PronunciationAnalyzer::new(
        Box::new(aligner),
        Box::new(recognizer),
        &cfg.analysis,
    ))
}

async fn serve(cfg: Config) -> Result<()> {
    let analyzer = Arc::new(build_analyzer(&cfg)?);
    let state = AppState::new(analyzer);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("{} listening on {}", cfg.service.name, addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    match cli.command {
        Command::Serve => serve(cfg).await,
        Command::Analyze { transcript, audio } => {
            let analyzer = build_analyzer(&cfg)?;
            let report = analyzer.analyze(&transcript, &audio).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Features {
            manifest,
            audio_dir,
            out,
        } => {
            let summary = extract_dataset(
                &manifest,
                &audio_dir,
                &out,
                MfccConfig::from(&cfg.features),
            )?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}
