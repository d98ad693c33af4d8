//! Backend entry-point: configuration, database bootstrap, and server startup.

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{
    BuildMode, key_fingerprint, session_settings_from_env,
};
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

mod server;

use server::{AppSettings, ServerConfig, create_server};

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

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("configuration error: {e}")))?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        key_fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );

    let db_pool = match settings.database_url() {
        Some(url) => Some(connect_database(url).await?),
        None => {
            warn!("DATABASE_URL not set; serving fixture data only");
            None
        }
    };

    #[cfg(feature = "sample-data")]
    seed_sample_data(db_pool.as_ref()).await?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr(),
    )
    .with_catalogue_settings(settings.catalogue_settings());
    if let Some(pool) = db_pool {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr(), "starting server");
    create_server(health_state, config)?.await
}

/// Apply pending migrations and build the connection pool.
///
/// Migrations run on a blocking connection so the async runtime is not tied
/// up during schema changes.
async fn connect_database(url: &str) -> std::io::Result<DbPool> {
    let applied = {
        let url = url.to_owned();
        tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .map_err(std::io::Error::other)?
            .map_err(std::io::Error::other)?
    };
    info!(applied, "database migrations up to date");

    DbPool::new(PoolConfig::new(url))
        .await
        .map_err(std::io::Error::other)
}

#[cfg(feature = "sample-data")]
async fn seed_sample_data(db_pool: Option<&DbPool>) -> std::io::Result<()> {
    let seed_settings = backend::sample_data::SampleDataSettings::load()
        .map_err(|e| std::io::Error::other(format!("sample data configuration error: {e}")))?;
    backend::sample_data::seed_sample_data_on_startup(&seed_settings, db_pool)
        .await
        .map_err(std::io::Error::other)?;
    Ok(())
}
