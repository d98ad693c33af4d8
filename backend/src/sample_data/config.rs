//! Sample data configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "password123";
const DEFAULT_BOOK_COUNT: usize = 15;

/// Configuration values controlling sample catalogue seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SAMPLE_DATA")]
pub struct SampleDataSettings {
    /// Enable sample data seeding on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Username of the administrator account to upsert.
    pub admin_username: Option<String>,
    /// Password for the administrator account.
    pub admin_password: Option<String>,
    /// Number of sample books to generate.
    pub book_count: Option<usize>,
}

impl SampleDataSettings {
    /// Return the configured admin username, falling back to the default.
    pub fn admin_username(&self) -> &str {
        self.admin_username.as_deref().unwrap_or(DEFAULT_ADMIN_USERNAME)
    }

    /// Return the configured admin password, falling back to the default.
    pub fn admin_password(&self) -> &str {
        self.admin_password.as_deref().unwrap_or(DEFAULT_ADMIN_PASSWORD)
    }

    /// Return the configured book count, falling back to the default.
    pub fn book_count(&self) -> usize {
        self.book_count.unwrap_or(DEFAULT_BOOK_COUNT)
    }
}
