use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use zigg_core::models::MediaFile;
use zigg_core::{ConsoleError, ErrorMetadata};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Read a media file picked on the command line.
pub fn load_media(path: &Path) -> anyhow::Result<MediaFile> {
    MediaFile::from_path(path).with_context(|| format!("Failed to load {}", path.display()))
}

pub fn load_all(paths: &[std::path::PathBuf]) -> anyhow::Result<Vec<MediaFile>> {
    paths.iter().map(|p| load_media(p)).collect()
}

/// Text of the blocking alert shown for a failed command.
pub fn alert_message(err: &anyhow::Error) -> String {
    match err.chain().find_map(|e| e.downcast_ref::<ConsoleError>()) {
        Some(console) => console.client_message(),
        None => format!("{:#}", err),
    }
}

/// Initialize tracing for CLI binaries. Logs go to stderr so stdout stays
/// parseable JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
