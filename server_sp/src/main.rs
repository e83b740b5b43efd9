use crate::api::{router, AppState};
use crate::config::{Cli, Command, DatabaseArgs, ServeArgs};
use crate::store::RecordStore;
use crate::submission::GridValidator;
use anyhow::Context;
use clap::Parser;
use core_sp::messages::settings::DatabaseSettings;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

mod api;
mod config;
mod store;
mod submission;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Create(args) => create(args),
        Command::Serve(args) => serve(args).await,
    }
}

fn create(args: DatabaseArgs) -> anyhow::Result<()> {
    let location = DatabaseSettings::from(args).location();
    RecordStore::create(&location)
        .with_context(|| format!("Failed to create database at {}", location.display()))?;
    println!("Database created in: {}", location.display());
    Ok(())
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let settings = args.settings()?;

    let store = RecordStore::open(settings.database.location())?;
    info!(
        "Opened {} with {} records",
        store.location().display(),
        store.all()?.len()
    );

    let state = AppState {
        store: Arc::new(store),
        validator: Arc::new(GridValidator::new()?),
    };

    let addr = settings.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Grid search server listening on {addr}");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
