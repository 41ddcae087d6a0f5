//! Application configuration loaded via OrthoConfig.
//!
//! Values come from `SHIPMENTS_*` environment variables, configuration files
//! and command-line flags. Accessors apply defaults so `main` only deals with
//! resolved values.

use std::net::{SocketAddr, ToSocketAddrs};

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use tracing::warn;
use url::Url;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::DEFAULT_ADMIN_ROLE;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_NAME: &str = "logistic_db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const JWT_SECRET_MIN_LEN: usize = 32;
const JWT_SECRET_ENV: &str = "SHIPMENTS_JWT_SECRET";

/// Build mode used to decide how strictly secrets are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to an ephemeral secret with a warning.
    Debug,
    /// Release builds require an explicit secret of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while resolving configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A setting required in this build mode is absent.
    #[error("missing required setting {name}")]
    MissingSetting {
        /// Environment variable that should carry the value.
        name: &'static str,
    },
    /// A secret is shorter than the release minimum.
    #[error("{name} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        /// Environment variable carrying the secret.
        name: &'static str,
        /// Length of the configured secret in bytes.
        length: usize,
        /// Minimum accepted length in bytes.
        min_len: usize,
    },
    /// The database URL could not be composed from its parts.
    #[error("invalid database url: {message}")]
    InvalidDatabaseUrl {
        /// Reason reported by the URL builder.
        message: String,
    },
    /// The bind host and port do not resolve to a socket address.
    #[error("invalid bind address {value}: {message}")]
    InvalidBindAddress {
        /// The `host:port` pair that failed.
        value: String,
        /// Resolver error text.
        message: String,
    },
}

/// Service settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHIPMENTS")]
pub struct AppSettings {
    /// Interface the HTTP server binds to.
    pub bind_host: Option<String>,
    /// Port the HTTP server listens on.
    pub port: Option<u16>,
    /// Full PostgreSQL URL; overrides the `db_*` parts when set.
    pub database_url: Option<String>,
    /// Database host used when composing the URL.
    pub db_host: Option<String>,
    /// Database port used when composing the URL.
    pub db_port: Option<u16>,
    /// Database user used when composing the URL.
    pub db_user: Option<String>,
    /// Database password used when composing the URL.
    pub db_password: Option<String>,
    /// Database name used when composing the URL.
    pub db_name: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection before failing.
    pub db_connect_timeout_secs: Option<u64>,
    /// HS256 secret used to verify bearer tokens.
    pub jwt_secret: Option<String>,
    /// Roles allowed to change shipment status. The environment form is
    /// comma separated.
    #[serde(default, deserialize_with = "one_or_many")]
    pub admin_roles: Option<Vec<String>>,
    /// Browser origins allowed by CORS. The environment form is comma
    /// separated.
    #[serde(default, deserialize_with = "one_or_many")]
    pub cors_allowed_origins: Option<Vec<String>>,
    /// Apply embedded migrations at startup.
    pub run_migrations: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accept a list setting given either as a sequence or as one bare value.
///
/// The environment layer only yields a sequence when the value contains a
/// comma.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }),
    )
}

fn cleaned_list(values: Option<&[String]>, default: &str) -> Vec<String> {
    let cleaned: Vec<String> = values
        .unwrap_or_default()
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect();
    if cleaned.is_empty() {
        vec![default.to_owned()]
    } else {
        cleaned
    }
}

impl AppSettings {
    /// Bind interface; defaults to `0.0.0.0`.
    pub fn bind_host(&self) -> &str {
        self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST)
    }

    /// Listen port; defaults to `8081`.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Resolve the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] when the host does not
    /// resolve.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.bind_host();
        let invalid = |message: String| ConfigError::InvalidBindAddress {
            value: format!("{host}:{}", self.port()),
            message,
        };
        (host, self.port())
            .to_socket_addrs()
            .map_err(|err| invalid(err.to_string()))?
            .next()
            .ok_or_else(|| invalid("no addresses resolved".to_owned()))
    }

    /// Pool size; defaults to 10.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Pool checkout timeout in seconds; defaults to 30.
    pub fn db_connect_timeout_secs(&self) -> u64 {
        self.db_connect_timeout_secs
            .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECS)
    }

    /// Return the explicit database URL or compose one from the `db_*` parts.
    ///
    /// Credentials are percent-encoded and `sslmode=disable` is appended to
    /// composed URLs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDatabaseUrl`] when a part cannot be
    /// placed into a URL.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = self.database_url.as_deref().filter(|url| !url.trim().is_empty()) {
            return Ok(url.to_owned());
        }

        let invalid = |message: &str| ConfigError::InvalidDatabaseUrl {
            message: message.to_owned(),
        };
        let mut url = Url::parse("postgres://localhost").map_err(|err| invalid(&err.to_string()))?;
        url.set_host(Some(self.db_host.as_deref().unwrap_or(DEFAULT_DB_HOST)))
            .map_err(|err| invalid(&err.to_string()))?;
        url.set_port(Some(self.db_port.unwrap_or(DEFAULT_DB_PORT)))
            .map_err(|()| invalid("port cannot be set"))?;
        url.set_username(self.db_user.as_deref().unwrap_or(DEFAULT_DB_USER))
            .map_err(|()| invalid("username cannot be set"))?;
        url.set_password(self.db_password.as_deref())
            .map_err(|()| invalid("password cannot be set"))?;
        url.set_path(self.db_name.as_deref().unwrap_or(DEFAULT_DB_NAME));
        url.query_pairs_mut().append_pair("sslmode", "disable");
        Ok(url.into())
    }

    /// Resolve the JWT verification secret.
    ///
    /// Debug builds without a configured secret get a random per-process
    /// secret and a warning; tokens signed elsewhere will not verify.
    ///
    /// # Errors
    ///
    /// Release builds fail with [`ConfigError::MissingSetting`] when no secret
    /// is configured and [`ConfigError::SecretTooShort`] when it is shorter
    /// than 32 bytes.
    pub fn jwt_secret(&self, mode: BuildMode) -> Result<Zeroizing<String>, ConfigError> {
        let configured = self
            .jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty());
        match (configured, mode) {
            (Some(secret), BuildMode::Release) if secret.len() < JWT_SECRET_MIN_LEN => {
                Err(ConfigError::SecretTooShort {
                    name: JWT_SECRET_ENV,
                    length: secret.len(),
                    min_len: JWT_SECRET_MIN_LEN,
                })
            }
            (Some(secret), _) => Ok(Zeroizing::new(secret.to_owned())),
            (None, BuildMode::Release) => Err(ConfigError::MissingSetting {
                name: JWT_SECRET_ENV,
            }),
            (None, BuildMode::Debug) => {
                warn!("{JWT_SECRET_ENV} not set; using an ephemeral secret (dev only)");
                Ok(Zeroizing::new(format!(
                    "{}{}",
                    Uuid::new_v4().simple(),
                    Uuid::new_v4().simple()
                )))
            }
        }
    }

    /// Roles granted status-update rights; defaults to `admin`.
    pub fn admin_roles(&self) -> Vec<String> {
        cleaned_list(self.admin_roles.as_deref(), DEFAULT_ADMIN_ROLE)
    }

    /// Origins allowed to call the API from a browser; defaults to
    /// `http://localhost:3000`.
    pub fn cors_allowed_origins(&self) -> Vec<String> {
        cleaned_list(self.cors_allowed_origins.as_deref(), DEFAULT_CORS_ORIGIN)
    }

    /// Whether to apply embedded migrations at startup; defaults to `true`.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}
