// certwatch - TLS certificate expiry tracker with scheduled reminders
// Licensed under GPL-3.0
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

use anyhow::Result;
use certwatch::api::{ApiServer, AppState};
use certwatch::checker::{CheckOutcome, TlsProbe};
use certwatch::config::AppConfig;
use certwatch::notify::{LogChannel, NotificationChannel, SlackChannel};
use certwatch::reminder::ReminderRunner;
use certwatch::store::{run_migrations, CertificateStore, DatabasePool, SqlStore};
use certwatch::upsert::UpsertCoordinator;
use certwatch::Args;
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize logging - respect RUST_LOG environment variable
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let args = Args::parse();

    // Load configuration from file or use defaults, then apply CLI overrides
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    if let Some(url) = &args.database_url {
        config.database.url = url.clone();
    }
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    config.validate()?;

    let pool = DatabasePool::connect(&config.database.url).await?;
    run_migrations(&pool).await?;

    let store: Arc<dyn CertificateStore> = Arc::new(SqlStore::new(pool));
    let probe = Arc::new(TlsProbe::new(
        config.checker.port,
        Duration::from_secs(config.checker.timeout_seconds),
    ));
    let coordinator = Arc::new(UpsertCoordinator::new(Arc::clone(&store), probe));

    let channel: Arc<dyn NotificationChannel> = match &config.slack {
        Some(slack) if slack.enabled => Arc::new(SlackChannel::new(slack.clone())),
        _ => Arc::new(LogChannel),
    };

    // One-shot mode: probe everything, print the results, exit
    if args.check_now {
        let results = coordinator
            .refresh_all(config.checker.max_concurrent_checks)
            .await?;

        for result in &results {
            match &result.outcome {
                CheckOutcome::Valid { expires } => {
                    println!(
                        "{} {} expires {}",
                        "✓".green(),
                        result.hostname,
                        expires.format("%Y-%m-%d %H:%M UTC")
                    );
                }
                CheckOutcome::Failed { reason } => {
                    println!("{} {} check failed: {}", "✗".red(), result.hostname, reason);
                }
                CheckOutcome::TimedOut => {
                    println!("{} {} check timed out", "✗".red(), result.hostname);
                }
            }
        }

        println!("\nChecked {} certificate(s)", results.len());
        return Ok(());
    }

    let runner = ReminderRunner::new(
        Arc::clone(&store),
        channel,
        Arc::clone(&coordinator),
        config.reminders.tiers(),
        config.reminders.check_hour,
        config.checker.max_concurrent_checks,
    );

    // One-shot mode: evaluate reminders against today and exit
    if args.remind_now {
        let sent = runner.run_once(Utc::now()).await?;
        println!("Sent {} reminder(s)", sent);
        return Ok(());
    }

    // Default mode: HTTP API plus the hourly reminder loop
    info!("Starting certwatch");

    let state = AppState::new(
        Arc::clone(&store),
        coordinator,
        config.server.public_url.clone(),
    );
    let server = ApiServer::new(config.server.host.clone(), config.server.port, state);

    tokio::select! {
        result = server.run() => result,
        result = runner.run() => result,
    }
}
