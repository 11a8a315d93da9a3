// src/notify/email.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::render::{render, RenderedReport};
use super::ReportSink;
use crate::analyze::CompositeAnalysis;
use crate::config::email::EmailConfig;
use crate::ingest::stats::Stats;
use crate::ingest::types::Bundle;

/// Sends the report as a multipart/alternative email over a STARTTLS relay.
pub struct EmailReporter {
    config: EmailConfig,
}

impl EmailReporter {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(EmailConfig::from_env()?))
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    /// Build the message without sending it.
    pub fn build_message(&self, report: &RenderedReport) -> Result<Message> {
        let from: Mailbox = self
            .config
            .from_email
            .parse()
            .context("invalid sender address")?;
        let to: Mailbox = self
            .config
            .to_email
            .parse()
            .context("invalid recipient address")?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(report.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(report.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(report.html.clone()),
                    ),
            )
            .context("build email")
    }

    pub async fn send(&self, report: &RenderedReport) -> Result<()> {
        let msg = self.build_message(report)?;
        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());
        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_server)
                .context("create SMTP transport")?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build();

        mailer.send(msg).await.context("send email")?;
        Ok(())
    }
}

#[async_trait]
impl ReportSink for EmailReporter {
    async fn deliver(&self, analysis: &CompositeAnalysis, bundle: &Bundle, stats: &Stats) -> bool {
        let report = render(analysis, bundle, stats);
        match self.send(&report).await {
            Ok(()) => {
                tracing::info!(to = %self.config.to_email, subject = %report.subject, "report email sent");
                true
            }
            Err(e) => {
                tracing::error!(error = ?e, server = %self.config.smtp_server, "report email failed");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(from: &str) -> EmailConfig {
        EmailConfig {
            smtp_server: "smtp.example.com".into(),
            smtp_port: 587,
            username: "bot@example.com".into(),
            password: "secret".into(),
            from_email: from.into(),
            to_email: "reader@example.com".into(),
        }
    }

    fn report() -> RenderedReport {
        RenderedReport {
            subject: "Daily AI Update".into(),
            html: "<p>hi</p>".into(),
            text: "hi".into(),
        }
    }

    #[test]
    fn builds_multipart_alternative() {
        let msg = EmailReporter::new(cfg("bot@example.com"))
            .build_message(&report())
            .unwrap();
        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("Subject: Daily AI Update"));
    }

    #[test]
    fn invalid_sender_is_an_error() {
        assert!(EmailReporter::new(cfg("not an address"))
            .build_message(&report())
            .is_err());
    }
}
