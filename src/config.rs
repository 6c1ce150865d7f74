//! Server configuration and shared request-handling state.

use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Document root all files are served from.
    pub root: String,
    /// Entry document, relative to the root. Requests for `/` or for this
    /// file by name go through placeholder injection.
    pub entry_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("SERVER").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("site.root", ".")?
            .set_default("site.entry_file", "index.html")?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// One placeholder marker and the environment variable that fills it.
#[derive(Debug, Clone)]
pub struct Placeholder {
    pub marker: String,
    pub var: String,
}

/// The recognized placeholder markers for the entry document.
///
/// Constructed once at startup and shared read-only through [`AppState`].
/// The set carries names only; values are resolved against the process
/// environment at request time.
#[derive(Debug, Clone)]
pub struct PlaceholderSet {
    entries: Vec<Placeholder>,
}

impl PlaceholderSet {
    pub fn new(entries: Vec<Placeholder>) -> Self {
        Self { entries }
    }

    /// Resolve every marker against the process environment, in the set's
    /// fixed order. Unset and empty variables both resolve to `""`.
    pub fn resolve(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|p| {
                let value = std::env::var(&p.var).unwrap_or_default();
                (p.marker.clone(), value)
            })
            .collect()
    }
}

impl Default for PlaceholderSet {
    /// The deployment's marker set: the Supabase connection values the
    /// entry document expects.
    fn default() -> Self {
        Self::new(vec![
            Placeholder {
                marker: "{{SUPABASE_URL}}".to_string(),
                var: "SUPABASE_URL".to_string(),
            },
            Placeholder {
                marker: "{{SUPABASE_ANON_KEY}}".to_string(),
                var: "SUPABASE_ANON_KEY".to_string(),
            },
        ])
    }
}

/// Shared state for request handling: the loaded configuration, the
/// placeholder set, and the precomputed route for the entry document.
pub struct AppState {
    pub config: Config,
    pub placeholders: PlaceholderSet,
    pub entry_route: String,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            placeholders: PlaceholderSet::default(),
            entry_route: format!("/{}", config.site.entry_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_carries_both_supabase_markers() {
        let set = PlaceholderSet::default();
        let resolved = set.resolve();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].0, "{{SUPABASE_URL}}");
        assert_eq!(resolved[1].0, "{{SUPABASE_ANON_KEY}}");
    }

    #[test]
    fn resolve_reads_environment_and_defaults_to_empty() {
        // Only this test touches the variable, so no cross-test race.
        let set = PlaceholderSet::new(vec![Placeholder {
            marker: "{{RESOLVE_TEST}}".to_string(),
            var: "ENVSERVE_RESOLVE_TEST".to_string(),
        }]);

        std::env::remove_var("ENVSERVE_RESOLVE_TEST");
        assert_eq!(set.resolve()[0].1, "");

        std::env::set_var("ENVSERVE_RESOLVE_TEST", "abc");
        assert_eq!(set.resolve()[0].1, "abc");
        std::env::remove_var("ENVSERVE_RESOLVE_TEST");
    }

    #[test]
    fn environment_overrides_reach_nested_config_keys() {
        // Only this test touches the override variable.
        std::env::set_var("SERVER_SITE__ROOT", "/srv/www");
        let config = Config::load().expect("load config");
        assert_eq!(config.site.root, "/srv/www");
        // Untouched keys keep their defaults.
        assert_eq!(config.site.entry_file, "index.html");
        assert_eq!(config.server.port, 5000);
        std::env::remove_var("SERVER_SITE__ROOT");
    }

    #[test]
    fn entry_route_is_rooted() {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                workers: None,
            },
            site: SiteConfig {
                root: ".".to_string(),
                entry_file: "index.html".to_string(),
            },
            logging: LoggingConfig { access_log: false },
        };
        let state = AppState::new(&config);
        assert_eq!(state.entry_route, "/index.html");
    }
}
