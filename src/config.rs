use std::{env, net::SocketAddr, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_API_URL: &str = "http://localhost:8000/api/";
const DEFAULT_SESSION_PATH: &str = "data/session.json";
const DEFAULT_AUTH_SCHEME: &str = "Token";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Backend base URL, always ending with `/`.
    pub api_url: String,
    pub session_path: PathBuf,
    pub auth_scheme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_url: DEFAULT_API_URL.to_string(),
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let api_url = lookup("WAREHOUSE_API_URL")
            .filter(|value| !value.trim().is_empty())
            .map(|value| normalize_base_url(&value))
            .unwrap_or(defaults.api_url);

        let session_path = lookup("WAREHOUSE_SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_path);

        let auth_scheme = lookup("WAREHOUSE_AUTH_SCHEME")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.auth_scheme);

        Self {
            port,
            api_url,
            session_path,
            auth_scheme,
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim().trim_end_matches('/'))
}
