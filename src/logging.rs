use crate::renderer::{MetadataPanel, PLACEHOLDER};
use crate::utils::truncate_str;
use crate::PreviewResult;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt as subscriber_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

#[derive(Debug)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    pub log_level: String,
    pub console_output: bool,
    pub file_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".into(),
            log_level: "info".into(),
            console_output: true,
            file_output: true,
        }
    }
}

fn create_separator(width: usize, ch: char) -> String {
    std::iter::repeat_n(ch, width).collect()
}

fn wrap_text(text: &str, width: usize) -> String {
    let mut wrapped = String::new();
    let mut line_length = 0;

    for word in text.split_whitespace() {
        if line_length > 0 && line_length + word.len() + 1 > width {
            wrapped.push('\n');
            wrapped.push_str("  ");
            wrapped.push_str(word);
            line_length = word.len() + 2;
        } else {
            if line_length > 0 {
                wrapped.push(' ');
                line_length += 1;
            }
            wrapped.push_str(word);
            line_length += word.len();
        }
    }
    wrapped
}

/// Formats the metadata panel of a result as a boxed card.
pub fn format_preview_card(result: &PreviewResult) -> String {
    const CARD_WIDTH: usize = 80;
    const CONTENT_WIDTH: usize = CARD_WIDTH - 2;

    let panel = MetadataPanel::new(result);
    let screenshot = result
        .screenshot
        .as_ref()
        .map(|s| s.src().to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let horizontal_line = "═".repeat(CARD_WIDTH - 2);

    format!(
        "╔{}╗\n\
         URL: {}\n\
         Title: {}\n\
         Desc: {}\n\
         Domain: {}\n\
         Keywords: {}\n\
         Image: {}\n\
         Screenshot: {}\n\
         ╚{}╝",
        horizontal_line,
        wrap_text(&panel.url, CONTENT_WIDTH - 5),
        wrap_text(&panel.title, CONTENT_WIDTH - 7),
        wrap_text(&panel.description, CONTENT_WIDTH - 6),
        wrap_text(&panel.domain, CONTENT_WIDTH - 8),
        wrap_text(&panel.keywords, CONTENT_WIDTH - 10),
        wrap_text(&panel.og_image, CONTENT_WIDTH - 7),
        wrap_text(&screenshot, CONTENT_WIDTH - 12),
        horizontal_line,
    )
}

pub fn log_preview_card(result: &PreviewResult) {
    info!("\n{}", format_preview_card(result));
}

pub fn log_error_card<E: Display + std::error::Error>(url: &str, error: &E) {
    const CARD_WIDTH: usize = 70;
    const CONTENT_WIDTH: usize = CARD_WIDTH - 8;

    let top_bottom = create_separator(CARD_WIDTH - 2, '═');
    let middle = create_separator(CARD_WIDTH - 2, '─');

    let mut error_details = error.to_string();
    if let Some(source) = error.source() {
        error_details = format!("{error_details} (caused by: {source})");
    }

    error!(
        "\n╔═{}═╗\n\
         ║ URL: {:<width$} ║\n\
         ║{}║\n\
         ║ Error: {:<width$} ║\n\
         ╚═{}═╝",
        top_bottom,
        truncate_str(url, CONTENT_WIDTH),
        middle,
        truncate_str(&error_details, CONTENT_WIDTH),
        top_bottom,
        width = CONTENT_WIDTH
    );
}

pub fn setup_logging(config: LogConfig) -> std::io::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let mut layers = Vec::new();

    if config.console_output {
        let console_layer = subscriber_fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .pretty();
        layers.push(console_layer.boxed());
    }

    if config.file_output {
        std::fs::create_dir_all(&config.log_dir)?;

        let file_appender = RollingFileAppender::new(
            Rotation::DAILY,
            &config.log_dir,
            "link-preview-generator.log",
        );

        let file_layer = subscriber_fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_writer(file_appender);

        layers.push(file_layer.boxed());
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(std::io::Error::other)?;

    debug!("Logging system initialized with config: {:?}", config);
    Ok(())
}

pub struct LogLevelGuard {
    _guard: tracing::dispatcher::DefaultGuard,
}

impl LogLevelGuard {
    pub fn set_level(level: &str) -> Self {
        let filter = EnvFilter::new(level);
        let subscriber = tracing_subscriber::registry()
            .with(subscriber_fmt::layer().with_test_writer())
            .with(filter);

        LogLevelGuard {
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PreviewError, Screenshot};

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("a b c", 80), "a b c");
        assert_eq!(wrap_text("alpha beta gamma", 10), "alpha beta\n  gamma");
    }

    #[test]
    fn test_preview_card_contents() {
        let result = PreviewResult {
            source_url: "https://www.example.com".into(),
            domain: "example.com".into(),
            title: Some("Example Domain".into()),
            screenshot: Some(Screenshot::Remote("https://cdn.example.com/s.png".into())),
            ..Default::default()
        };
        let card = format_preview_card(&result);

        assert!(card.contains("Title: Example Domain"));
        assert!(card.contains("Domain: example.com"));
        assert!(card.contains(&format!("Keywords: {PLACEHOLDER}")));
        assert!(card.contains("Screenshot: https://cdn.example.com/s.png"));
    }

    #[test]
    fn test_cards_log_under_scoped_subscriber() {
        let _guard = LogLevelGuard::set_level("debug");
        log_preview_card(&PreviewResult::default());
        log_error_card(
            "https://example.com",
            &PreviewError::ServiceError {
                status: 500,
                message: Some("rate limited".into()),
            },
        );
    }
}
