//! Environment-driven settings loaded via OrthoConfig.
//!
//! `MYSQL_*` variables describe the store connection and `LOGTAIL_*`
//! variables the remote log collector. Every value is optional; accessors
//! supply the defaults.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_MYSQL_HOST: &str = "localhost";
const DEFAULT_MYSQL_PORT: u16 = 3306;
const DEFAULT_LOGTAIL_URL: &str = "https://in.logs.betterstack.com";

/// Errors raised while turning settings into connection targets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The configured host cannot appear in a URL.
    #[error("invalid MySQL host {host:?}: {message}")]
    InvalidHost { host: String, message: String },
    /// Credentials could not be attached to the URL.
    #[error("MySQL credentials cannot be encoded in the connection URL")]
    InvalidCredentials,
    /// The collector endpoint is not a valid URL.
    #[error("invalid Logtail URL {url:?}: {message}")]
    InvalidLogtailUrl { url: String, message: String },
}

/// MySQL connection settings (`MYSQL_HOST`, `MYSQL_PORT`, `MYSQL_USER`,
/// `MYSQL_PASSWORD`, `MYSQL_DATABASE`).
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MYSQL")]
pub struct StoreSettings {
    /// Server host name or address.
    pub host: Option<String>,
    /// Server TCP port.
    pub port: Option<u16>,
    /// Account name.
    pub user: Option<String>,
    /// Account password.
    pub password: Option<String>,
    /// Schema holding the `users` table.
    pub database: Option<String>,
}

impl StoreSettings {
    /// Configured host, falling back to `localhost`.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_MYSQL_HOST)
    }

    /// Configured port, falling back to 3306.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_MYSQL_PORT)
    }

    /// Build the `mysql://` connection URL with percent-encoded credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the host or credentials cannot be
    /// represented in a URL.
    pub fn database_url(&self) -> Result<Url, SettingsError> {
        let invalid_host = |message: String| SettingsError::InvalidHost {
            host: self.host().to_owned(),
            message,
        };
        let mut url = Url::parse("mysql://localhost").map_err(|e| invalid_host(e.to_string()))?;
        url.set_host(Some(self.host()))
            .map_err(|e| invalid_host(e.to_string()))?;
        url.set_port(Some(self.port()))
            .map_err(|()| invalid_host("port not accepted".to_owned()))?;
        if let Some(user) = self.user.as_deref().filter(|u| !u.is_empty()) {
            url.set_username(user)
                .map_err(|()| SettingsError::InvalidCredentials)?;
            url.set_password(self.password.as_deref())
                .map_err(|()| SettingsError::InvalidCredentials)?;
        }
        if let Some(database) = self.database.as_deref() {
            url.set_path(database);
        }
        Ok(url)
    }
}

impl std::fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSettings")
            .field("host", &self.host())
            .field("port", &self.port())
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .finish()
    }
}

/// Remote log collector settings (`LOGTAIL_TOKEN`, `LOGTAIL_URL`).
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOGTAIL")]
pub struct LogShippingSettings {
    /// Source token; remote shipping is disabled when absent.
    pub token: Option<String>,
    /// Collector endpoint.
    pub url: Option<String>,
}

impl LogShippingSettings {
    /// Token when configured and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.trim().is_empty())
    }

    /// Collector endpoint, falling back to Better Stack's ingestion host.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidLogtailUrl`] when the configured value
    /// does not parse.
    pub fn endpoint(&self) -> Result<Url, SettingsError> {
        let raw = self.url.as_deref().unwrap_or(DEFAULT_LOGTAIL_URL);
        Url::parse(raw).map_err(|e| SettingsError::InvalidLogtailUrl {
            url: raw.to_owned(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for LogShippingSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogShippingSettings")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("url", &self.url)
            .finish()
    }
}
