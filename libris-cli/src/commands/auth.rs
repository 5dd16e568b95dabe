//! Sign-in, registration and password commands

use super::{spinner, user_error};
use anyhow::{bail, Result};
use libris_core::account::{
    FORGOT_FALLBACK_MESSAGE, LOGIN_FALLBACK_MESSAGE, REGISTER_FALLBACK_MESSAGE,
    RESET_FALLBACK_MESSAGE, SET_PASSWORD_FALLBACK_MESSAGE,
};
use libris_core::{landing_area, LibrisClient, RegistrationForm};

pub async fn login(client: &LibrisClient, email: &str, password: &str) -> Result<()> {
    let pb = spinner("Signing in...");
    let result = client.accounts().login(email, password).await;
    pb.finish_and_clear();

    let role = result.map_err(|e| user_error(e, LOGIN_FALLBACK_MESSAGE))?;
    println!("Signed in as {}.", role);
    println!("Start at: {}", landing_area(&role).title());
    Ok(())
}

pub async fn logout(client: &LibrisClient) -> Result<()> {
    client.accounts().logout().await?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami(client: &LibrisClient) -> Result<()> {
    match client.session().role() {
        Some(role) => {
            println!("Signed in as {}.", role);
            println!("Start at: {}", landing_area(&role).title());
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

pub async fn register(client: &LibrisClient, form: &RegistrationForm) -> Result<()> {
    let pb = spinner("Registering...");
    let result = client.accounts().register(form).await;
    pb.finish_and_clear();

    result.map_err(|e| user_error(e, REGISTER_FALLBACK_MESSAGE))?;
    println!("Registration submitted. A librarian has to approve your account.");
    Ok(())
}

pub async fn forgot_password(client: &LibrisClient, email: &str) -> Result<()> {
    client
        .accounts()
        .forgot_password(email)
        .await
        .map_err(|e| user_error(e, FORGOT_FALLBACK_MESSAGE))?;
    println!("If the address is registered, a reset link is on its way.");
    Ok(())
}

pub async fn reset_password(
    client: &LibrisClient,
    token: &str,
    password: &str,
    confirm: &str,
) -> Result<()> {
    let pb = spinner("Checking reset link...");
    let valid = client.accounts().reset_token_is_valid(token).await;
    pb.finish_and_clear();

    if !valid.map_err(|e| user_error(e, RESET_FALLBACK_MESSAGE))? {
        bail!("Invalid or expired reset link.");
    }

    client
        .accounts()
        .reset_password(token, password, confirm)
        .await
        .map_err(|e| user_error(e, RESET_FALLBACK_MESSAGE))?;
    println!("Password reset. You can sign in now.");
    Ok(())
}

pub async fn set_password(
    client: &LibrisClient,
    token: Option<&str>,
    password: &str,
    confirm: &str,
) -> Result<()> {
    client
        .accounts()
        .set_password(token, password, confirm)
        .await
        .map_err(|e| user_error(e, SET_PASSWORD_FALLBACK_MESSAGE))?;
    println!("Password set. You can sign in now.");
    Ok(())
}
