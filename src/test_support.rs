//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::bible::{Book, Verse};
use crate::core::action::{Action, update};
use crate::core::state::App;
use crate::core::theme::ThemeId;

fn book(id: u32, name: &str, chapter_count: u32) -> Book {
    Book {
        id,
        chronorder: id,
        name: name.to_string(),
        chapter_count,
    }
}

/// A small catalogue covering both divisions and numbered books.
pub fn sample_books() -> Vec<Book> {
    vec![
        book(1, "Genesis", 50),
        book(2, "Exodus", 40),
        book(9, "1 Samuel", 31),
        book(19, "Psalms", 150),
        book(22, "Song of Solomon", 8),
        book(40, "Matthew", 28),
        book(43, "John", 21),
        book(62, "1 John", 5),
        book(65, "Jude", 1),
        book(66, "Revelation", 22),
    ]
}

/// `count` verses numbered from 1 with short, distinct text.
pub fn sample_verses(book_id: u32, chapter: u32, count: u32) -> Vec<Verse> {
    (1..=count)
        .map(|n| Verse {
            pk: u64::from(n),
            number: n,
            text: format!("Verse {n} of chapter {chapter} says something worth reading."),
            translation: Some("NLT".to_string()),
            book_id,
            chapter,
        })
        .collect()
}

/// A fresh App on Genesis 1 with an 80x20 viewport.
pub fn test_app() -> App {
    let mut app = App::new("NLT".to_string(), ThemeId::default(), vec!["NLT".into(), "KJV".into()]);
    update(&mut app, Action::Resize { width: 80, height: 20 });
    app
}

/// A test App with books loaded and Genesis 1 (31 verses) on screen.
pub fn loaded_app() -> App {
    let mut app = test_app();
    update(&mut app, Action::Init);
    update(
        &mut app,
        Action::BooksLoaded {
            translation: "NLT".to_string(),
            books: sample_books(),
        },
    );
    let token = app.pending.as_ref().map(|p| p.token).unwrap_or_default();
    update(
        &mut app,
        Action::ChapterLoaded {
            token,
            verses: sample_verses(1, 1, 31),
        },
    );
    app
}
