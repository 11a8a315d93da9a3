// src/config/email.rs
use anyhow::{Context, Result};
use std::env;

use crate::config::ai::mask_secret;

/// SMTP settings for the daily report.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub to_email: String,
}

impl EmailConfig {
    /// Reads SMTP_SERVER (default smtp.gmail.com), SMTP_PORT (default 587), SMTP_USERNAME,
    /// SMTP_PASSWORD, EMAIL_FROM and EMAIL_TO. Sender defaults to the username.
    pub fn from_env() -> Result<Self> {
        let smtp_server = env::var("SMTP_SERVER").unwrap_or_else(|_| "smtp.gmail.com".into());
        let smtp_port = match env::var("SMTP_PORT") {
            Ok(p) => p.trim().parse().context("invalid SMTP_PORT")?,
            Err(_) => 587,
        };
        let username = required("SMTP_USERNAME")?;
        let password = required("SMTP_PASSWORD")?;
        let from_email = env::var("EMAIL_FROM")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| username.clone());
        let to_email = required("EMAIL_TO")?;

        Ok(Self {
            smtp_server,
            smtp_port,
            username,
            password,
            from_email,
            to_email,
        })
    }

    pub fn masked_password(&self) -> String {
        mask_secret(&self.password)
    }
}

fn required(var: &str) -> Result<String> {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("{var} missing"))
}
