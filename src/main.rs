//! Backend entry-point: wires configuration, persistence, and the HTTP
//! server.

use std::env;
use std::net::SocketAddr;

use chrono::Duration;
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use keepsake::domain::TokenConfig;
use keepsake::outbound::persistence::{DbPool, PoolConfig};
use keepsake::server::{self, ServerConfig};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let bind_addr = load_bind_addr()?;
    let token = load_token_config()?;
    let mut config = ServerConfig::new(bind_addr, token);

    match env::var("DATABASE_URL") {
        Ok(database_url) => {
            run_migrations(&database_url)?;
            let pool = DbPool::new(PoolConfig::new(&database_url))
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            config = config.with_db_pool(pool);
        }
        Err(_) => {
            warn!("DATABASE_URL not set; using in-memory stores (dev only)");
        }
    }

    server::run(config).await
}

fn load_bind_addr() -> std::io::Result<SocketAddr> {
    let raw = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
    raw.parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR {raw}: {e}")))
}

fn load_token_config() -> std::io::Result<TokenConfig> {
    let ttl_secs = env::var("TOKEN_TTL_SECS")
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(DEFAULT_TOKEN_TTL_SECS);

    let secret_path =
        env::var("TOKEN_SECRET_FILE").unwrap_or_else(|_| "/var/run/secrets/token_secret".into());
    let secret = match std::fs::read(&secret_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            let allow_dev = env::var("TOKEN_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %secret_path, error = %e, "using ephemeral token secret (dev only)");
                let mut bytes = [0u8; 32];
                getrandom::getrandom(&mut bytes)
                    .map_err(|err| std::io::Error::other(err.to_string()))?;
                bytes.to_vec()
            } else {
                return Err(std::io::Error::other(format!(
                    "failed to read token secret at {secret_path}: {e}"
                )));
            }
        }
    };

    Ok(TokenConfig::new(secret, Duration::seconds(ttl_secs)))
}

fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|e| std::io::Error::other(format!("database connection failed: {e}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
    Ok(())
}
