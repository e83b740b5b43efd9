use crate::constants::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Options for the grid search server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// IP address to listen on
    pub host: [u8; 4],
    /// Port to listen on
    pub port: u16,
    /// Options for the record store
    pub database: DatabaseSettings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST,
            port: DEFAULT_SERVER_PORT,
            database: Default::default(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::from(self.host), self.port))
    }
}

/// Where the record store lives
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Directory containing the store
    pub path: PathBuf,
    /// File name of the store, like `grid_search.db`
    pub name: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            name: "grid_search.db".to_string(),
        }
    }
}

impl DatabaseSettings {
    pub fn location(&self) -> PathBuf {
        self.path.join(&self.name)
    }
}
