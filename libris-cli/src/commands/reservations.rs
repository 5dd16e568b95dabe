//! Reservation listing and the reserve command

use super::{spinner, user_error};
use anyhow::{anyhow, Context, Result};
use libris_core::reservation::RESERVE_FALLBACK_MESSAGE;
use libris_core::{Area, LibrisClient, ReservationDialog, SearchFilters};

/// Show the member's reservations and remaining quota
pub async fn reservations(client: &LibrisClient, json: bool) -> Result<()> {
    client
        .session()
        .require(Area::MyReservations)
        .map_err(|e| anyhow!(e))?;

    let pb = spinner("Loading reservations...");
    client
        .reservations()
        .load()
        .await
        .context("Failed to load reservations")?;
    pb.finish_and_clear();

    let reservations = client.reservations().active_reservations();
    if json {
        println!("{}", serde_json::to_string_pretty(&*reservations)?);
        return Ok(());
    }

    let quota = client.reservations().quota();
    println!(
        "{} of {} reservations in use ({} left)",
        quota.active,
        quota.max,
        quota.remaining()
    );

    for reservation in reservations.iter() {
        println!();
        println!("{} by {}", reservation.book_title, reservation.book_author);
        println!("  Status:      {}", reservation.status);
        println!("  Pick up at:  {}", reservation.book_copy_location);
        println!("  Return to:   {}", reservation.return_location);
        println!(
            "  Reserved:    {}",
            reservation.reserved_at.format("%Y-%m-%d %H:%M")
        );
        println!(
            "  Due:         {}",
            reservation.expires_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

/// Reserve `copy_id` through the reservation dialog
pub async fn reserve(
    client: &LibrisClient,
    copy_id: i64,
    period: u32,
    return_library: Option<i64>,
) -> Result<()> {
    client
        .session()
        .require(Area::MyReservations)
        .map_err(|e| anyhow!(e))?;

    let pb = spinner("Loading catalog...");
    let manager = client.reservations();
    let (loaded, books) = tokio::join!(
        manager.load(),
        client.catalog().search(SearchFilters::new())
    );
    loaded.context("Failed to load reservations")?;
    let books = books.context("Search failed")?;
    pb.finish_and_clear();

    let book = books
        .iter()
        .find(|book| book.book_copy_id == Some(copy_id))
        .cloned()
        .ok_or_else(|| anyhow!("No book copy with id {} in the catalog.", copy_id))?;

    let mut dialog = ReservationDialog::new();
    dialog.open(book.clone(), manager.home_library());
    dialog.set_lending_period(period);
    if return_library.is_some() {
        dialog.set_return_library(return_library);
    }
    let return_library = dialog.draft().and_then(|draft| draft.return_library);

    let pb = spinner(&format!("Reserving {}...", book.title));
    let result = dialog.confirm(manager).await;
    pb.finish_and_clear();

    // The dialog stays open with the error; the CLI has no retry loop
    result.map_err(|e| user_error(e, RESERVE_FALLBACK_MESSAGE))?;

    let library = manager
        .libraries()
        .iter()
        .find(|library| Some(library.id) == return_library)
        .map(|library| library.name.clone())
        .unwrap_or_default();
    println!(
        "Reserved {} for {} days, return to {}.",
        book.title, period, library
    );
    let quota = manager.quota();
    println!("{} of {} reservations in use.", quota.active, quota.max);
    Ok(())
}
