//! Search and library listing commands

use super::spinner;
use anyhow::{Context, Result};
use libris_core::{BookListing, BookStatus, CoverArt, LibrisClient, SearchFilters};
use serde::Serialize;

/// Search result row for JSON output
#[derive(Serialize)]
struct SearchRow<'a> {
    #[serde(flatten)]
    book: &'a BookListing,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover: Option<String>,
}

fn status_label(book: &BookListing) -> &'static str {
    match book.status {
        Some(BookStatus::Available) => "available",
        Some(BookStatus::Reserved) => "reserved",
        Some(BookStatus::Unknown) | None => "-",
    }
}

fn cover_label(art: &CoverArt) -> String {
    match art {
        CoverArt::Loading => "...".to_string(),
        CoverArt::Image(url) => url.clone(),
        CoverArt::Placeholder(letter) => format!("[{}]", letter),
    }
}

/// Search the catalog
pub async fn search(
    client: &LibrisClient,
    filters: SearchFilters,
    covers: bool,
    json: bool,
) -> Result<()> {
    let pb = spinner("Searching catalog...");
    let books = client
        .catalog()
        .search(filters)
        .await
        .context("Search failed")?;

    if covers {
        pb.set_message("Looking up covers...");
        client.covers().wait_pending().await;
    }
    pb.finish_and_clear();

    tracing::debug!("Search returned {} books", books.len());

    let cover_for = |book: &BookListing| {
        covers.then(|| cover_label(&client.covers().art(&book.title)))
    };

    if json {
        let rows: Vec<_> = books
            .iter()
            .map(|book| SearchRow {
                book,
                cover: cover_for(book),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No books found.");
        return Ok(());
    }

    for book in books.iter() {
        let copy = book
            .book_copy_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>6}  {:<10} {} by {}",
            copy,
            status_label(book),
            book.title,
            book.author
        );
        if let Some(category) = &book.category {
            println!("        Category: {}", category);
        }
        if let Some(location) = &book.location {
            println!("        Location: {}", location);
        }
        if let Some(cover) = cover_for(book) {
            println!("        Cover:    {}", cover);
        }
    }

    Ok(())
}

/// List the libraries
pub async fn libraries(client: &LibrisClient) -> Result<()> {
    let pb = spinner("Loading libraries...");
    client
        .reservations()
        .load()
        .await
        .context("Failed to load libraries")?;
    pb.finish_and_clear();

    let home = client.reservations().home_library();
    for library in client.reservations().libraries().iter() {
        let marker = if Some(library.id) == home { "*" } else { " " };
        println!("{}{:>4}  {} ({})", marker, library.id, library.name, library.location);
    }

    Ok(())
}
