//! Environment-driven service settings.
//!
//! Read once at startup. Tests inject variables through `mockable::MockEnv`.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use mockable::Env;
use tracing::warn;

use crate::domain::StatsOptions;
use crate::middleware::CorsPolicy;

const PORT_ENV: &str = "PORT";
const DB_PATH_ENV: &str = "DB_PATH";
const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";
const DEBUG_ENV: &str = "DEBUG";
const DOCKER_ENV: &str = "DOCKER_ENV";

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_DB_PATH: &str = "test.db";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:*";
const PORT_EXPECTED: &str = "an integer between 0 and 65535";

/// Errors raised while reading settings.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Listen port; the server binds every IPv4 interface.
    pub port: u16,
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Browser origins allowed to call the API.
    pub allowed_origins: CorsPolicy,
    /// Development mode was requested.
    pub debug: bool,
    /// Running inside a container, treated as production.
    pub containerised: bool,
}

impl Settings {
    /// Development mode is honoured only outside containers.
    pub fn dev_mode(&self) -> bool {
        self.debug && !self.containerised
    }

    /// Stats switches derived from the deployment mode.
    pub fn stats_options(&self) -> StatsOptions {
        StatsOptions {
            dev_mode: self.dev_mode(),
        }
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

/// Whether the container marker file `/.dockerenv` exists.
pub fn dockerenv_present() -> bool {
    Dir::open_ambient_dir("/", ambient_authority())
        .is_ok_and(|root| root.exists(".dockerenv"))
}

/// Read settings from the environment.
///
/// `dockerenv_present` reports the container marker file; see
/// [`dockerenv_present`].
///
/// # Errors
///
/// Returns [`SettingsError::InvalidEnv`] for an unparsable `PORT` or `DEBUG`.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use userdesk::settings::settings_from_env;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "PORT" => Some("8080".to_string()),
///     "DEBUG" => Some("True".to_string()),
///     _ => None,
/// });
///
/// let settings = settings_from_env(&env, false).expect("valid settings");
/// assert_eq!(settings.port, 8080);
/// assert!(settings.dev_mode());
/// ```
pub fn settings_from_env<E: Env>(
    env: &E,
    dockerenv_present: bool,
) -> Result<Settings, SettingsError> {
    let port = match env.string(PORT_ENV) {
        Some(value) => value
            .trim()
            .parse::<u16>()
            .map_err(|_| SettingsError::InvalidEnv {
                name: PORT_ENV,
                value,
                expected: PORT_EXPECTED,
            })?,
        None => DEFAULT_PORT,
    };

    let debug = env.string(DEBUG_ENV).is_some_and(|value| {
        parse_bool(&value).unwrap_or_else(|| {
            warn!(name = DEBUG_ENV, %value, "unrecognised flag value; treating as false");
            false
        })
    });

    let docker_flag = env
        .string(DOCKER_ENV)
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));

    let db_path = env
        .string(DB_PATH_ENV)
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_DB_PATH), PathBuf::from);

    let origins = env
        .string(ALLOWED_ORIGINS_ENV)
        .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_owned());

    Ok(Settings {
        port,
        db_path,
        allowed_origins: CorsPolicy::from_list(&origins),
        debug,
        containerised: docker_flag || dockerenv_present,
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
