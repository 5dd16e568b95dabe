//! Librarian approval commands

use super::{spinner, user_error};
use anyhow::{anyhow, Result};
use libris_core::{Area, LibrisClient};

const APPROVE_FALLBACK_MESSAGE: &str = "Failed to approve user.";

pub async fn pending_users(client: &LibrisClient, json: bool) -> Result<()> {
    client
        .session()
        .require(Area::ApproveUsers)
        .map_err(|e| anyhow!(e))?;

    let pb = spinner("Loading registrations...");
    let result = client.accounts().pending_users().await;
    pb.finish_and_clear();

    let users = result.map_err(|e| user_error(e, "Failed to load users."))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!("No registrations waiting for approval.");
        return Ok(());
    }
    for user in &users {
        println!("{:>6}  {:<10} {}", user.id, user.role, user.email);
    }
    Ok(())
}

pub async fn approve(client: &LibrisClient, user_id: i64) -> Result<()> {
    client
        .session()
        .require(Area::ApproveUsers)
        .map_err(|e| anyhow!(e))?;

    client
        .accounts()
        .approve_user(user_id)
        .await
        .map_err(|e| user_error(e, APPROVE_FALLBACK_MESSAGE))?;
    println!("Approved user {}.", user_id);
    Ok(())
}
