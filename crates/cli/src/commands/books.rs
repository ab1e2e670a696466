//! Book management commands.
//!
//! # Usage
//!
//! ```bash
//! ss-cli books list
//! ss-cli books add -t "Quiet Rivers" -p '$3.49' -d "Poems about water"
//! ss-cli books remove new-book-1718000000000
//! ```

use soft_stories_cms::SiteConfig;
use soft_stories_cms::gateway::GatewayError;
use soft_stories_core::{BookId, Price};

use super::{CommandError, ensure_persisted, loaded_content, open};

/// Print one line per book: id, price and title.
#[allow(clippy::print_stdout)]
pub fn list(config: &SiteConfig) {
    let ctx = open(config);
    let content = loaded_content(&ctx);

    if content.books.is_empty() {
        tracing::info!("No books");
        return;
    }
    for book in &content.books {
        println!("{}\t{}\t{}", book.id, book.price.display(), book.title);
    }
}

/// Add a book built from the new-book template.
///
/// # Errors
///
/// Returns `CommandError` if the price is invalid or the book cannot be
/// stored.
#[allow(clippy::print_stdout)]
pub fn add(
    config: &SiteConfig,
    title: &str,
    price: &str,
    description: &str,
) -> Result<(), CommandError> {
    let price: Price = price
        .parse()
        .map_err(|e| CommandError::InvalidArgument(format!("price {price:?}: {e}")))?;

    let mut ctx = open(config);
    let mut gateway = ctx.gateway();
    let mut book = gateway.new_book_template()?;
    book.title = title.to_owned();
    book.price = price;
    book.description = description.to_owned();

    let id = book.id.clone();
    ensure_persisted(gateway.save_book(book)?)?;
    tracing::info!(%id, title, "Book added");
    println!("{id}");
    Ok(())
}

/// Remove the book with `id`.
///
/// # Errors
///
/// Returns `CommandError` if no book has that id or the removal cannot be
/// stored.
pub fn remove(config: &SiteConfig, id: &str) -> Result<(), CommandError> {
    let id = BookId::new(id);
    let mut ctx = open(config);

    match ctx.gateway().delete_book(&id)? {
        Some(persistence) => {
            ensure_persisted(persistence)?;
            tracing::info!(%id, "Book removed");
            Ok(())
        }
        None => Err(GatewayError::BookNotFound(id).into()),
    }
}
