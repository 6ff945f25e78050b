// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use dotenvy::dotenv;

const DEFAULT_DATABASE_URL: &str = "sqlite://quiz.db?mode=rwc";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub db_max_connections: u32,
    pub rust_log: String,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let listen_addr = parse_or_default(
            "APP_ADDR",
            SocketAddr::from(([0, 0, 0, 0], 3000)),
            DEFAULT_LISTEN_ADDR,
        );

        let db_max_connections = parse_or_default(
            "DB_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
            &DEFAULT_MAX_CONNECTIONS.to_string(),
        );

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        Self {
            database_url,
            listen_addr,
            db_max_connections,
            rust_log,
            log_dir,
        }
    }
}

/// Reads `key` from the environment, keeping `default` when it is unset or unparseable.
/// Runs before logging is initialised, so problems go to stderr.
fn parse_or_default<T: FromStr>(key: &str, default: T, shown: &str) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid value {raw:?} for {key}, using {shown}");
            default
        }),
        Err(_) => default,
    }
}
