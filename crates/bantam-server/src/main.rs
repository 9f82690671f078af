//! Bantam: an on-call alerting server. Resolves people and teams into
//! concrete contact plans and drives them through voice, SMS, email, and
//! webhook transports until someone acknowledges.

mod config;
mod error;
mod handlers;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bantam_adapters::persistence::SqliteDb;
use bantam_adapters::transport::{MailgunSender, TwilioSms, TwilioVoice, WebhookSender};
use bantam_app::engine::Engine;
use bantam_app::resolver::PlanResolver;
use bantam_app::rotation::RotationEngine;
use bantam_ports::outbound::ContactSender;

use config::Config;
use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "bantam", about = "on-call alerting server")]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "bantam.yaml", env = "BANTAM_CONFIG")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        warn!(path = %args.config.display(), "config file not found, using defaults");
        Config::default()
    };

    let db = SqliteDb::new(&config.service.db_url).await?;

    let http = reqwest::Client::new();
    let urls = config.callback_urls();
    let mut senders: Vec<Arc<dyn ContactSender>> = Vec::new();
    let mut sms = None;

    if let Some(twilio) = config.integrations.twilio.clone() {
        senders.push(Arc::new(TwilioVoice::new(
            http.clone(),
            twilio.clone(),
            urls.clone(),
        )));
        let sms_sender = Arc::new(TwilioSms::new(http.clone(), twilio, urls.clone()));
        senders.push(sms_sender.clone());
        sms = Some(sms_sender);
    } else {
        warn!("twilio is not configured; phone and SMS steps will be skipped");
    }
    if let Some(mailgun) = config.integrations.mailgun.clone() {
        senders.push(Arc::new(MailgunSender::new(
            http.clone(),
            mailgun,
            urls.clone(),
        )));
    } else {
        warn!("mailgun is not configured; email steps will be skipped");
    }
    senders.push(Arc::new(WebhookSender::new(http)));

    let engine = Engine::new(senders);
    let resolver = Arc::new(PlanResolver::new(db.clone(), db.clone(), db.clone()));
    let rotations = RotationEngine::new(db.clone(), db.clone());
    rotations.start().await?;

    let state = AppState {
        db,
        engine,
        resolver,
        rotations,
        sms,
    };

    let listener = tokio::net::TcpListener::bind(&config.service.listen_addr).await?;
    info!(addr = %config.service.listen_addr, "bantam listening");
    axum::serve(listener, handlers::router(state)).await?;
    Ok(())
}
