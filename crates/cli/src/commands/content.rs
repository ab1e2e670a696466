//! Whole-document content commands.
//!
//! # Usage
//!
//! ```bash
//! ss-cli content show --section books
//! ss-cli content export - > backup.json
//! ss-cli content import backup.json
//! ss-cli content reset
//! ```

use std::path::Path;

use clap::ValueEnum;
use soft_stories_cms::SiteConfig;
use soft_stories_core::{SiteContent, decode_document};

use super::{CommandError, ensure_persisted, loaded_content, open};

/// Part of the document to print.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Section {
    Home,
    About,
    Books,
    Settings,
}

fn to_json(value: &impl serde::Serialize) -> Result<String, CommandError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CommandError::InvalidArgument(format!("cannot serialize content: {e}")))
}

/// Print the content, or one section of it, as JSON.
///
/// # Errors
///
/// Returns `CommandError` if the content cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn show(config: &SiteConfig, section: Option<Section>) -> Result<(), CommandError> {
    let ctx = open(config);
    let content = loaded_content(&ctx);

    let json = match section {
        None => to_json(&*content)?,
        Some(Section::Home) => to_json(&content.home)?,
        Some(Section::About) => to_json(&content.about)?,
        Some(Section::Books) => to_json(&content.books)?,
        Some(Section::Settings) => to_json(&content.settings)?,
    };
    println!("{json}");
    Ok(())
}

/// Replace the stored content with the defaults.
///
/// # Errors
///
/// Returns `CommandError` if the defaults cannot be stored.
pub fn reset(config: &SiteConfig) -> Result<(), CommandError> {
    let mut ctx = open(config);
    let persistence = ctx.gateway().edit(|draft| *draft = SiteContent::default())?;
    ensure_persisted(persistence)?;
    tracing::info!("Content reset to defaults");
    Ok(())
}

/// Write the content to `path`, or stdout for `-`.
///
/// # Errors
///
/// Returns `CommandError` if the file cannot be written.
#[allow(clippy::print_stdout)]
pub async fn export(config: &SiteConfig, path: &Path) -> Result<(), CommandError> {
    let ctx = open(config);
    let json = to_json(&*loaded_content(&ctx))?;

    if path == Path::new("-") {
        println!("{json}");
    } else {
        tokio::fs::write(path, json)
            .await
            .map_err(|e| CommandError::file("Failed to write", path, e))?;
        tracing::info!(path = %path.display(), "Content exported");
    }
    Ok(())
}

/// Replace the content with the document in `path`.
///
/// Documents in the legacy format are upgraded on the way in.
///
/// # Errors
///
/// Returns `CommandError` if the file cannot be read, is not a content
/// document, or cannot be stored.
pub async fn import(config: &SiteConfig, path: &Path) -> Result<(), CommandError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CommandError::file("Failed to read", path, e))?;
    let (imported, upgraded_from) = decode_document(&raw)?;
    if let Some(from) = upgraded_from {
        tracing::info!(from, "Upgraded imported document");
    }

    let books = imported.books.len();
    let mut ctx = open(config);
    let persistence = ctx.gateway().edit(|draft| *draft = imported)?;
    ensure_persisted(persistence)?;
    tracing::info!(path = %path.display(), books, "Content imported");
    Ok(())
}
