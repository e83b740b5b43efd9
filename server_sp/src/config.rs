//! Command line arguments, and the [`ServerSettings`] they resolve to

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use core_sp::messages::settings::{DatabaseSettings, ServerSettings};
use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Shortest paths through square grids, behind a small HTTP API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty record store
    Create(DatabaseArgs),
    /// Open a record store and serve the HTTP API
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Directory where the store should be created
    #[arg(short, long)]
    pub path: PathBuf,
    /// File name of the store, like my_db.sqlite
    #[arg(short, long)]
    pub name: String,
}

impl From<DatabaseArgs> for DatabaseSettings {
    fn from(args: DatabaseArgs) -> Self {
        Self {
            path: args.path,
            name: args.name,
        }
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Directory where the store is located
    #[arg(short, long)]
    pub path: Option<PathBuf>,
    /// File name of the store
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(long)]
    pub host: Option<Ipv4Addr>,
    #[arg(long)]
    pub port: Option<u16>,
    /// TOML settings file; flags take precedence over it
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ServeArgs {
    pub fn settings(&self) -> anyhow::Result<ServerSettings> {
        let mut settings = match &self.config {
            Some(path) => load_settings(path)?,
            None => ServerSettings::default(),
        };
        if let Some(path) = &self.path {
            settings.database.path = path.clone();
        }
        if let Some(name) = &self.name {
            settings.database.name = name.clone();
        }
        if let Some(host) = self.host {
            settings.host = host.octets();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        Ok(settings)
    }
}

pub fn load_settings(path: &Path) -> anyhow::Result<ServerSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid settings in {}", path.display()))
}
