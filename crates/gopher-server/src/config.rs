//! Server configuration
//!
//! Flags fall back to environment variables; a `.env` file in the working
//! directory is loaded before parsing.

use clap::{Parser, ValueEnum};

const DEFAULT_NAME: &str = "gopherapi";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Process-local map, lost on restart
    Inmem,
    /// Embedded SQLite file
    Sqlite,
    /// Redis server
    Redis,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "gopher-server")]
#[command(author, version, about = "Gopher CRUD REST service", long_about = None)]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "GOPHERAPI_SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the HTTP server listens on
    #[arg(long, env = "GOPHERAPI_SERVER_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Identifier reported in logs and /health
    #[arg(long, env = "GOPHERAPI_SERVER_ID")]
    pub server_id: Option<String>,

    /// Storage backend
    #[arg(long, env = "GOPHERAPI_DATABASE", value_enum, default_value_t = Backend::Inmem)]
    pub database: Backend,

    /// SQLite database file, `:memory:` for a throwaway database
    #[arg(long, env = "SQLITE_PATH", default_value = "data/gophers.db")]
    pub sqlite_path: String,

    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// Load the sample gophers on startup
    #[arg(long)]
    pub with_data: bool,

    /// Emit a tracing span per request
    #[arg(long, env = "GOPHERAPI_WITH_TRACE")]
    pub with_trace: bool,

    /// Log as JSON lines
    #[arg(long, env = "GOPHERAPI_LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    /// `host:port` for binding. Hostnames are resolved at bind time; bare
    /// IPv6 hosts are bracketed.
    pub fn http_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Configured server id, or `{GOPHERAPI_NAME}-{hostname}`.
    pub fn server_id(&self) -> String {
        if let Some(id) = self.server_id.as_deref().filter(|id| !id.is_empty()) {
            return id.to_string();
        }

        let name = std::env::var("GOPHERAPI_NAME")
            .ok()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        let host = whoami::fallible::hostname().unwrap_or_else(|_| "unknown".to_string());
        format!("{}-{}", name, host)
    }
}
