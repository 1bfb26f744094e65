use std::env;

/// Application-level constants
pub const APP_NAME: &str = "MedRemind";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Port used when `PORT` is unset or unparseable
pub const DEFAULT_PORT: u16 = 8080;

/// The web client's development URL
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Time zone assigned to new accounts that don't send one
pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Plain-text body of the liveness route
pub const LIVENESS_MESSAGE: &str = "Backend is running...";

const STORE_URI_VAR: &str = "STORE_URI";
const PORT_VAR: &str = "PORT";
const ALLOWED_ORIGIN_VAR: &str = "ALLOWED_ORIGIN";

/// Tracing filter used when `RUST_LOG` is not set
pub fn default_log_filter() -> &'static str {
    "info,medremind_lib=debug"
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Store connection string. `None` makes the store connection fail.
    pub store_uri: Option<String>,
    pub port: u16,
    pub allowed_origin: String,
}

impl Config {
    /// Load from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_uri = lookup(STORE_URI_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if store_uri.is_none() {
            tracing::warn!("{STORE_URI_VAR} not set, store connection will fail");
        }

        let port = match lookup(PORT_VAR) {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|e| {
                tracing::warn!("Invalid {PORT_VAR} value {raw:?}: {e}, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => {
                tracing::info!("{PORT_VAR} not set, using default: {DEFAULT_PORT}");
                DEFAULT_PORT
            }
        };

        let allowed_origin = lookup(ALLOWED_ORIGIN_VAR)
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());

        Self {
            store_uri,
            port,
            allowed_origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_empty() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.store_uri, None);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup_from(&[
            ("STORE_URI", "sqlite://data/medremind.db"),
            ("PORT", "5000"),
            ("ALLOWED_ORIGIN", "https://app.example.org/"),
        ]));
        assert_eq!(config.store_uri.as_deref(), Some("sqlite://data/medremind.db"));
        assert_eq!(config.port, 5000);
        assert_eq!(config.allowed_origin, "https://app.example.org");
    }

    #[test]
    fn invalid_port_falls_back_to_default() {
        let config = Config::from_lookup(lookup_from(&[("PORT", "eighty")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn blank_store_uri_is_treated_as_missing() {
        let config = Config::from_lookup(lookup_from(&[("STORE_URI", "   ")]));
        assert_eq!(config.store_uri, None);
    }

    #[test]
    fn app_name_is_medremind() {
        assert_eq!(APP_NAME, "MedRemind");
    }
}
