// ABOUTME: Entry point for pdfchat: a terminal client for asking questions about a PDF.
// ABOUTME: Parses CLI args, loads config, sets up logging, and launches the app.

use std::path::PathBuf;

use clap::Parser;

use pdfchat::app::App;
use pdfchat::config::{AskOrdering, Config};
use pdfchat::logging;

#[derive(Parser, Debug)]
#[command(name = "pdfchat", version, about = "Ask questions about a PDF from your terminal")]
struct Cli {
    /// Base URL of the question-answering service.
    #[arg(long)]
    base_url: Option<String>,

    /// Config file to use instead of ~/.pdfchat/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the exported summary is written to.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Send one question at a time; a later question waits for the current answer.
    #[arg(long)]
    serialize_asks: bool,

    /// PDF to upload once the service is ready.
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env();
    if let Some(url) = cli.base_url {
        config.service.base_url = url;
    }
    if let Some(dir) = cli.export_dir {
        config.export.directory = dir.to_string_lossy().to_string();
    }
    if cli.serialize_asks {
        config.ask.ordering = AskOrdering::Serialized;
    }

    if let Err(e) = logging::init(&Config::log_path()) {
        eprintln!("Warning: file logging disabled: {}", e);
    }

    App::new(config, cli.file).run().await
}
