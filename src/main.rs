mod cli_logger;

use anyhow::Result;
use clap::Parser;
use profiler_ui::{
    CommandEngine, Config, Dispatcher, PprofRenderer, UiError, bind, local_url, run_server,
};
use tracing_subscriber::EnvFilter;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::cli_logger::CliLogger;

#[derive(Debug, Parser)]
#[command(name = "profiler-ui", version, about = "Local web UI for model profiling runs")]
struct Cli {
    /// Port the web server listens on.
    #[arg(long = "server_port", default_value_t = 7007)]
    server_port: u16,

    /// Profile context the engine is built from.
    #[arg(long = "profile_context_path", default_value = "")]
    profile_context_path: String,

    /// Optional TOML config overriding paths and external tools.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not open a browser window on startup.
    #[arg(long = "no_browser")]
    no_browser: bool,

    #[arg(long = "no_color")]
    no_color: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let logger = CliLogger::new(cli.no_color);
    match run(&cli, &logger).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = match err.downcast_ref::<UiError>() {
                Some(UiError::Usage(msg)) => {
                    logger.print_error(msg);
                    2
                }
                _ => {
                    logger.print_error(&format!("{err:#}"));
                    1
                }
            };
            ExitCode::from(code)
        }
    }
}

async fn run(cli: &Cli, logger: &CliLogger) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_optional(path),
        None => Config::default(),
    };
    let engine = CommandEngine::from_context(Path::new(&cli.profile_context_path), &config.engine)?;
    let renderer = PprofRenderer::new(&config.renderer);
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(config),
        Arc::new(engine),
        Arc::new(renderer),
    )?);

    let listener = bind(cli.server_port).await?;
    logger.print_ready(&local_url(&listener)?, &cli.profile_context_path);
    run_server(listener, dispatcher, !cli.no_browser).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
