//! CLI command implementations

mod approvals;
mod auth;
mod catalog;
mod reservations;

pub use approvals::{approve, pending_users};
pub use auth::{forgot_password, login, logout, register, reset_password, set_password, whoami};
pub use catalog::{libraries, search};
pub use reservations::{reservations, reserve};

use indicatif::{ProgressBar, ProgressStyle};
use libris_core::LibrisError;
use std::time::Duration;

/// Animated spinner shown while a request is in flight
fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

/// Turn a core error into the message the user should see
fn user_error(err: LibrisError, fallback: &str) -> anyhow::Error {
    tracing::debug!("{:?}", err);
    anyhow::anyhow!(err.user_message(fallback))
}
