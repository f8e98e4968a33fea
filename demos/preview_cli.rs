use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use link_preview_generator::{
    log_error_card, log_preview_card, setup_logging, FetcherConfig, LogConfig, PreviewController,
    PreviewError, Screenshot, DEFAULT_SCREENSHOT_ENDPOINT,
};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// JSON metadata from `{base}/api/preview`
    Metadata,
    /// Raw screenshot bytes from a screenshot endpoint
    Screenshot,
}

#[derive(Debug, Parser)]
#[command(about = "Generate a link preview and social cards for a URL")]
struct Args {
    /// URL to preview, passed to the service as typed
    url: String,

    #[arg(long, value_enum, default_value_t = Mode::Screenshot)]
    mode: Mode,

    /// Service base URL (metadata) or full endpoint (screenshot)
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Write a fetched screenshot to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Also write logs under ./logs
    #[arg(long)]
    log_file: bool,
}

fn build_controller(args: &Args) -> Result<PreviewController, PreviewError> {
    let mut config = match args.mode {
        Mode::Metadata => FetcherConfig::metadata(
            args.endpoint.as_deref().unwrap_or("http://localhost:3000"),
        )?,
        Mode::Screenshot => FetcherConfig::screenshot(
            args.endpoint.as_deref().unwrap_or(DEFAULT_SCREENSHOT_ENDPOINT),
        )?,
    };
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    PreviewController::with_fetcher_config(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(LogConfig {
        log_level: "warn".into(),
        file_output: args.log_file,
        ..Default::default()
    })?;

    let controller = match build_controller(&args) {
        Ok(controller) => controller,
        Err(e) => {
            log_error_card(&args.url, &e);
            return Err(e.into());
        }
    };
    controller.set_input(args.url.as_str());

    let Some(pending) = controller.begin() else {
        eprintln!("{}", "Nothing to preview: the URL is empty".yellow());
        return Ok(());
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(controller.render().control.label);
    spinner.enable_steady_tick(Duration::from_millis(100));

    pending.complete().await;
    spinner.finish_and_clear();

    let page = controller.render();
    if let Some(notice) = &page.notice {
        eprintln!("{}: {}", "Error".bold().red(), notice);
        return Ok(());
    }

    println!("{}", page.to_string().green());

    controller.with_state(|state| -> Result<(), Box<dyn Error>> {
        let Some(result) = &state.result else {
            return Ok(());
        };
        log_preview_card(result);

        if let (Some(path), Some(Screenshot::Local(handle))) = (&args.save, &result.screenshot) {
            if let Some(bytes) = handle.bytes() {
                std::fs::write(path, &bytes[..])?;
                println!("{} {}", "Saved screenshot to".bold(), path.display());
            }
        }
        Ok(())
    })?;

    controller.dispose();
    Ok(())
}
