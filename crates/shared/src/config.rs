//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Single-user login credentials.
    pub auth: AuthConfig,
    /// Ledger defaults.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8888
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations when the server starts.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_run_migrations() -> bool {
    true
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Value of the `iss` claim.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Token lifetime in hours.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// Token lifetime in days when the client asks to be remembered.
    #[serde(default = "default_remember_ttl_days")]
    pub remember_ttl_days: i64,
}

fn default_issuer() -> String {
    "hearth".to_string()
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_remember_ttl_days() -> i64 {
    30
}

/// Credentials of the single ledger owner.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Login name.
    pub username: String,
    /// Argon2 PHC string of the password.
    pub password_hash: String,
}

/// Ledger defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Currency assigned to accounts created without one.
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "CNY".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("HEARTH").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [(&str, Option<&str>); 4] = [
        ("HEARTH__DATABASE__URL", Some("postgres://localhost/hearth")),
        ("HEARTH__JWT__SECRET", Some("secret")),
        ("HEARTH__AUTH__USERNAME", Some("owner")),
        ("HEARTH__AUTH__PASSWORD_HASH", Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA")),
    ];

    #[test]
    fn test_load_applies_defaults() {
        temp_env::with_vars(REQUIRED, || {
            let config = AppConfig::load().unwrap();

            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.server.port, 8888);
            assert_eq!(config.database.url, "postgres://localhost/hearth");
            assert_eq!(config.database.max_connections, 10);
            assert!(config.database.run_migrations);
            assert_eq!(config.jwt.issuer, "hearth");
            assert_eq!(config.jwt.token_ttl_hours, 24);
            assert_eq!(config.jwt.remember_ttl_days, 30);
            assert_eq!(config.auth.username, "owner");
            assert_eq!(config.ledger.default_currency, "CNY");
        });
    }

    #[test]
    fn test_load_reads_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("HEARTH__SERVER__PORT", Some("9000")));
        vars.push(("HEARTH__LEDGER__DEFAULT_CURRENCY", Some("USD")));
        vars.push(("HEARTH__DATABASE__RUN_MIGRATIONS", Some("false")));

        temp_env::with_vars(vars, || {
            let config = AppConfig::load().unwrap();

            assert_eq!(config.server.port, 9000);
            assert_eq!(config.ledger.default_currency, "USD");
            assert!(!config.database.run_migrations);
        });
    }

    #[test]
    fn test_load_fails_without_database_url() {
        temp_env::with_vars(
            [
                ("HEARTH__DATABASE__URL", None::<&str>),
                ("HEARTH__JWT__SECRET", Some("secret")),
                ("HEARTH__AUTH__USERNAME", Some("owner")),
                ("HEARTH__AUTH__PASSWORD_HASH", Some("hash")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
