//! Soft Stories CLI - Inspect and edit the site's stored content.
//!
//! Works on file-backed durable storage in `SITE_DATA_DIR` (default
//! `.soft-stories`), one JSON document per storage key.
//!
//! # Usage
//!
//! ```bash
//! # Print the stored content
//! ss-cli content show
//!
//! # Replace the stored content with the built-in defaults
//! ss-cli content reset
//!
//! # Back up and restore
//! ss-cli content export backup.json
//! ss-cli content import backup.json
//!
//! # Manage books
//! ss-cli books list
//! ss-cli books add -t "Quiet Rivers" -p 3.49
//! ss-cli books remove new-book-1718000000000
//!
//! # Embed an image
//! ss-cli image set --about portrait.jpg
//! ss-cli image set --book windows-of-change-1 cover.png
//!
//! # Print the theme as CSS variables
//! ss-cli theme css
//!
//! # Check whether a credential would be let into the dashboard
//! ss-cli auth check "$TOKEN"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ss-cli")]
#[command(author, version, about = "Soft Stories CLI tools")]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// Storage directory (overrides `SITE_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or replace the whole content document
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Manage books
    Books {
        #[command(subcommand)]
        action: BooksAction,
    },
    /// Embed images into the content
    Image {
        #[command(subcommand)]
        action: ImageAction,
    },
    /// Theme palette
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Admin login
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum ContentAction {
    /// Print the stored content as JSON
    Show {
        /// Only print one section
        #[arg(short, long, value_enum)]
        section: Option<commands::content::Section>,
    },
    /// Replace the stored content with the defaults
    Reset,
    /// Write the content to a file (`-` for stdout)
    Export { path: PathBuf },
    /// Replace the content with a document read from a file
    Import { path: PathBuf },
}

#[derive(Subcommand)]
enum BooksAction {
    /// List books in display order
    List,
    /// Add a new book
    Add {
        /// Book title
        #[arg(short, long)]
        title: String,

        /// Price in dollars
        #[arg(short, long, default_value = "0")]
        price: String,

        /// Short description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Remove a book by id
    Remove { id: String },
}

#[derive(Subcommand)]
enum ImageAction {
    /// Embed an image file as a book cover, the about portrait or the logo
    Set {
        /// Use as the cover of this book
        #[arg(long, conflicts_with_all = ["about", "logo"])]
        book: Option<String>,

        /// Use as the about page portrait
        #[arg(long, conflicts_with = "logo")]
        about: bool,

        /// Use as the site logo
        #[arg(long)]
        logo: bool,

        /// Image file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the palette as a `:root` CSS rule
    Css,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Check a provider credential against the configured admin
    Check {
        /// The credential token
        token: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "soft_stories_cms=info,soft_stories_cli=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);
    match cli.log_format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = soft_stories_cms::SiteConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Commands::Content { action } => match action {
            ContentAction::Show { section } => commands::content::show(&config, section)?,
            ContentAction::Reset => commands::content::reset(&config)?,
            ContentAction::Export { path } => commands::content::export(&config, &path).await?,
            ContentAction::Import { path } => commands::content::import(&config, &path).await?,
        },
        Commands::Books { action } => match action {
            BooksAction::List => commands::books::list(&config),
            BooksAction::Add {
                title,
                price,
                description,
            } => commands::books::add(&config, &title, &price, &description)?,
            BooksAction::Remove { id } => commands::books::remove(&config, &id)?,
        },
        Commands::Image { action } => match action {
            ImageAction::Set {
                book,
                about,
                logo,
                path,
            } => {
                let target = commands::image::target(book, about, logo)?;
                commands::image::set(&config, target, &path).await?;
            }
        },
        Commands::Theme { action } => match action {
            ThemeAction::Css => commands::theme::css(&config),
        },
        Commands::Auth { action } => match action {
            AuthAction::Check { token } => commands::auth::check(&config, &token)?,
        },
    }
    Ok(())
}
