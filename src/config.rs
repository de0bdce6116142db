use std::net::SocketAddr;

use chrono::Duration;
use clap::{Parser, ValueEnum};

use crate::auth::TokenService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    Production,
}

/// Server options. Each flag falls back to its environment variable.
#[derive(Debug, Parser)]
#[clap(name = "music_forum", version, about = "Music forum HTTP server")]
pub struct Config {
    #[clap(long, env = "BIND_ADDR", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Without it, everything is kept in memory and lost on exit.
    #[clap(long, env = "MONGODB_URI")]
    pub mongodb_uri: Option<String>,

    #[clap(long, env = "MONGODB_DATABASE", default_value = "music-forum")]
    pub database: String,

    #[clap(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Token lifetime in whole hours, at least one.
    #[clap(
        long,
        env = "TOKEN_TTL_HOURS",
        default_value = "24",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub token_ttl_hours: u32,

    #[clap(long, env = "APP_ENV", value_enum, default_value = "development")]
    pub environment: Environment,
}

impl Config {
    pub fn token_service(&self) -> TokenService {
        TokenService::new(self.jwt_secret.as_bytes(), Duration::hours(i64::from(self.token_ttl_hours)))
    }

    /// Internal error details are only sent to clients during development.
    pub fn expose_internal_errors(&self) -> bool { self.environment == Environment::Development }
}
