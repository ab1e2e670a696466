//! Integration tests for book operations through the update gateway.

#![allow(clippy::unwrap_used)]

use soft_stories_cms::SiteContext;
use soft_stories_cms::auth::NoopProvider;
use soft_stories_core::BookId;
use soft_stories_integration_tests::{admin_config, book, content_with_books, origin_with};

fn ids(ctx: &SiteContext) -> Vec<String> {
    ctx.store()
        .read()
        .loaded()
        .unwrap()
        .books
        .iter()
        .map(|b| b.id.to_string())
        .collect()
}

#[test]
fn test_delete_second_of_three() {
    let origin = origin_with(&content_with_books(vec![
        book("b1", "One"),
        book("b2", "Two"),
        book("b3", "Three"),
    ]));
    let mut tab = SiteContext::open(&origin, &admin_config(), NoopProvider);

    let outcome = tab.gateway().delete_book(&BookId::new("b2")).unwrap();
    assert!(outcome.is_some_and(|p| p.is_persisted()));
    assert_eq!(ids(&tab), ["b1", "b3"]);

    assert_eq!(tab.gateway().delete_book(&BookId::new("b2")).unwrap(), None);
    assert_eq!(ids(&tab), ["b1", "b3"]);
}

#[test]
fn test_repeated_save_is_idempotent() {
    let origin = origin_with(&content_with_books(vec![book("b1", "One")]));
    let mut tab = SiteContext::open(&origin, &admin_config(), NoopProvider);

    let mut edited = book("b1", "One, revised");
    edited.purchase_links.gumroad = "https://gumroad.example/one".to_string();
    tab.gateway().save_book(edited.clone()).unwrap();
    let after_first = tab.store().read().loaded().unwrap();
    tab.gateway().save_book(edited).unwrap();
    let after_second = tab.store().read().loaded().unwrap();

    assert_eq!(after_first.books, after_second.books);
    assert_eq!(after_second.books.len(), 1);
}

#[test]
fn test_new_book_ids_are_unique() {
    let origin = origin_with(&content_with_books(vec![]));
    let mut tab = SiteContext::open(&origin, &admin_config(), NoopProvider);

    let mut gateway = tab.gateway();
    let first = gateway.new_book_template_at(1_700_000_000_000).unwrap();
    gateway.save_book(first.clone()).unwrap();
    let second = gateway.new_book_template_at(1_700_000_000_000).unwrap();

    assert_eq!(first.id.as_str(), "new-book-1700000000000");
    assert_ne!(first.id, second.id);
}
