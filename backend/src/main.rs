//! Backend entry-point: loads configuration, wires adapters, runs the
//! server.

use std::env;
use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use lifevein_backend::domain::TokenIssuer;
use lifevein_backend::inbound::http::health::HealthState;
use lifevein_backend::outbound::persistence::{DbPool, PoolConfig};
use lifevein_backend::server::{ServerConfig, create_server};

const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Load the token signing secret.
///
/// Order: `LIFEVEIN_TOKEN_SECRET_FILE`, then `LIFEVEIN_TOKEN_SECRET`. Debug
/// builds (or `LIFEVEIN_ALLOW_EPHEMERAL_SECRET=1`) fall back to a generated
/// secret, which invalidates all tokens on restart.
fn load_signing_secret() -> std::io::Result<Zeroizing<Vec<u8>>> {
    if let Ok(path) = env::var("LIFEVEIN_TOKEN_SECRET_FILE") {
        return std::fs::read(&path).map(Zeroizing::new).map_err(|err| {
            std::io::Error::other(format!("failed to read token secret at {path}: {err}"))
        });
    }
    if let Ok(secret) = env::var("LIFEVEIN_TOKEN_SECRET") {
        return Ok(Zeroizing::new(secret.into_bytes()));
    }

    let allow_dev = env::var("LIFEVEIN_ALLOW_EPHEMERAL_SECRET").ok().as_deref() == Some("1");
    if cfg!(debug_assertions) || allow_dev {
        warn!("using an ephemeral token secret (dev only); tokens will not survive restarts");
        let mut secret = vec![0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), secret.as_mut_slice());
        Ok(Zeroizing::new(secret))
    } else {
        Err(std::io::Error::other(
            "no token secret configured; set LIFEVEIN_TOKEN_SECRET or LIFEVEIN_TOKEN_SECRET_FILE",
        ))
    }
}

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

    let secret = load_signing_secret()?;
    let token_issuer = Arc::new(TokenIssuer::new(&secret));
    info!(
        secret_fingerprint = token_issuer.secret_fingerprint(),
        "token issuer initialised"
    );

    let bind_addr = env::var("LIFEVEIN_BIND")
        .unwrap_or_else(|_| DEFAULT_BIND.to_owned())
        .parse()
        .map_err(|err| std::io::Error::other(format!("invalid LIFEVEIN_BIND: {err}")))?;

    let db_pool = match env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;
            info!("database pool initialised");
            Some(pool)
        }
        Err(_) => {
            warn!("DATABASE_URL not set; falling back to in-memory stores (dev only)");
            None
        }
    };

    let config = ServerConfig::new(bind_addr, token_issuer).with_db_pool(db_pool);
    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting server");
    create_server(health_state, config)?.await
}
