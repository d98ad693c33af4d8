//! HTTP server configuration object and settings loading.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use backend::domain::CatalogueSettings;
use backend::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

/// Application settings loaded via OrthoConfig.
///
/// Environment variables carry the `SHELFSIDE_` prefix, so the listener is
/// moved with `SHELFSIDE_BIND_ADDR` and persistence is switched on with
/// `SHELFSIDE_DATABASE_URL`. Session cookie toggles are deliberately not
/// here; they stay in the dedicated session configuration module.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHELFSIDE")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection URL; fixture ports serve when absent.
    pub database_url: Option<String>,
    /// Reject a second review from the same user on the same book.
    #[ortho_config(default = false)]
    pub single_review_per_user: bool,
}

impl AppSettings {
    /// Return the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Return the configured database URL, if any.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// Catalogue behaviour switches derived from these settings.
    pub fn catalogue_settings(&self) -> CatalogueSettings {
        CatalogueSettings {
            single_review_per_user: self.single_review_per_user,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) catalogue: CatalogueSettings,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            catalogue: CatalogueSettings::default(),
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses database-backed implementations for
    /// the account and catalogue ports; without it every port is served by
    /// its fixture.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the catalogue behaviour switches.
    #[must_use]
    pub fn with_catalogue_settings(mut self, settings: CatalogueSettings) -> Self {
        self.catalogue = settings;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for application settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("SHELFSIDE_BIND_ADDR", None::<String>),
            ("SHELFSIDE_DATABASE_URL", None::<String>),
            ("SHELFSIDE_SINGLE_REVIEW_PER_USER", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert!(settings.database_url().is_none());
        assert!(!settings.single_review_per_user);
        assert!(!settings.catalogue_settings().single_review_per_user);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("SHELFSIDE_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "SHELFSIDE_DATABASE_URL",
                Some("postgres://localhost/shelfside".to_owned()),
            ),
            ("SHELFSIDE_SINGLE_REVIEW_PER_USER", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr().port(), 9090);
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/shelfside")
        );
        assert!(settings.catalogue_settings().single_review_per_user);
    }

    #[rstest]
    fn server_config_defaults_to_fixture_ports() {
        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("valid socket address"),
        );

        assert!(config.db_pool.is_none());
        assert!(!config.catalogue.single_review_per_user);
        assert_eq!(config.bind_addr().port(), 0);
    }
}
