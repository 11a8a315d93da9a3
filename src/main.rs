//! Daily AI digest: binary entrypoint.
//! Collects today's AI news, runs the analysis facets and delivers the report.

use ai_daily_digest::config::{AiConfig, EmailConfig};
use ai_daily_digest::ingest::config::load_sources_default;
use ai_daily_digest::metrics::Metrics;
use ai_daily_digest::notify::{EmailReporter, HtmlFileSink, ReportSink};
use ai_daily_digest::{init_tracing, Analyzer, Collector, Orchestrator};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "ai-daily-digest", version, about)]
struct Cli {
    /// Emit logs as JSON lines instead of compact text.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the full daily workflow (default).
    Run(RunArgs),
    /// Check source access, the LLM and email settings without sending anything.
    SelfTest,
    /// Print the effective configuration with secrets masked.
    ShowConfig,
}

#[derive(Debug, Default, clap::Args)]
struct RunArgs {
    /// Directory for the execution record (and the HTML report with --no-email).
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Write the HTML report to --out-dir instead of sending email.
    #[arg(long)]
    no_email: bool,

    /// Write Prometheus metrics text to this file after the run.
    #[arg(long)]
    metrics_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let res = match cli.command.unwrap_or(Command::Run(RunArgs {
        out_dir: PathBuf::from("."),
        ..RunArgs::default()
    })) {
        Command::Run(args) => run(args).await,
        Command::SelfTest => self_test().await,
        Command::ShowConfig => show_config(),
    };

    match res {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = ?e, "fatal");
            ExitCode::FAILURE
        }
    }
}

fn build_orchestrator(sink: Box<dyn ReportSink>) -> Result<Orchestrator> {
    let sources = load_sources_default().context("load sources config")?;
    let ai = AiConfig::load_default().context("load AI config")?;
    let collector = Collector::from_config(&sources)?;
    let analyzer = Analyzer::from_config(&ai)?;
    Ok(Orchestrator::new(collector, analyzer, sink).with_email_config(EmailConfig::from_env().ok()))
}

async fn run(args: RunArgs) -> Result<ExitCode> {
    let metrics = match args.metrics_out {
        Some(_) => Some(Metrics::init()?),
        None => None,
    };

    let sink: Box<dyn ReportSink> = if args.no_email {
        Box::new(HtmlFileSink::new(&args.out_dir))
    } else {
        Box::new(EmailReporter::from_env().context("email settings (use --no-email for a dry run)")?)
    };

    let record = build_orchestrator(sink)?.run_daily().await;
    let path = record.save(&args.out_dir)?;
    tracing::info!(path = %path.display(), "execution record saved");

    if let (Some(m), Some(out)) = (metrics, args.metrics_out.as_deref()) {
        m.write_to(out)?;
        tracing::info!(path = %out.display(), "metrics written");
    }

    Ok(if record.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn self_test() -> Result<ExitCode> {
    let orchestrator = build_orchestrator(Box::new(HtmlFileSink::new(std::env::temp_dir())))?;
    let report = orchestrator.run_self_test().await;
    for (name, ok) in report.checks() {
        println!("{name}: {}", if ok { "PASS" } else { "FAIL" });
    }
    Ok(if report.all_passed() {
        println!("All checks passed.");
        ExitCode::SUCCESS
    } else {
        println!("Some checks failed; review the configuration.");
        ExitCode::FAILURE
    })
}

fn show_config() -> Result<ExitCode> {
    let ai = AiConfig::load_default()?;
    let sources = load_sources_default()?;
    println!("AI provider:   {} ({})", ai.provider, ai.model_name());
    println!("AI enabled:    {}", ai.enabled);
    println!("AI key:        {}", ai.masked_key());
    println!("Facet timeout: {:?}", ai.facet_timeout());
    match EmailConfig::from_env() {
        Ok(e) => {
            println!("SMTP server:   {}:{}", e.smtp_server, e.smtp_port);
            println!("SMTP user:     {} ({})", e.username, e.masked_password());
            println!("Email from:    {}", e.from_email);
            println!("Email to:      {}", e.to_email);
        }
        Err(e) => println!("Email:         not configured ({e})"),
    }
    println!("GitHub keywords: {}", sources.github.keywords.len());
    println!("Subreddits:    {}", sources.reddit.subreddits.join(", "));
    Ok(ExitCode::SUCCESS)
}
