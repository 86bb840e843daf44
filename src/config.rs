//! Configuration management for the report server

use std::env;
use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub reports: ReportConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted JSON body
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Optional script font, checked once at startup
    pub font_path: String,
}

/// Page destinations used by the auth gate
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthConfig {
    pub login_page: String,
    pub director_dashboard: String,
    pub admin_dashboard: String,
    pub default_dashboard: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            login_page: "login.html".to_string(),
            director_dashboard: "director-dashboard.html".to_string(),
            admin_dashboard: "admin-dashboard.html".to_string(),
            default_dashboard: "all-requests-d.html".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                max_body_bytes: 50 * 1024 * 1024,
            },
            reports: ReportConfig {
                font_path: "Amiri-Regular.ttf".to_string(),
            },
            auth: AuthConfig::default(),
        }
    }
}

/// Parse a variable, falling back to `default` when unset or invalid
fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value {:?} for {}, using default", raw, key);
            default
        }),
        Err(_) => default,
    }
}

fn string_or(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from the environment; every variable is optional
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            server: ServerConfig {
                host: string_or("SERVER_HOST", defaults.server.host),
                port: parsed_or("SERVER_PORT", defaults.server.port),
                max_body_bytes: parsed_or("MAX_BODY_BYTES", defaults.server.max_body_bytes),
            },
            reports: ReportConfig {
                font_path: string_or("REPORT_FONT_PATH", defaults.reports.font_path),
            },
            auth: AuthConfig {
                login_page: string_or("AUTH_LOGIN_PAGE", defaults.auth.login_page),
                director_dashboard: string_or("AUTH_DIRECTOR_DASHBOARD", defaults.auth.director_dashboard),
                admin_dashboard: string_or("AUTH_ADMIN_DASHBOARD", defaults.auth.admin_dashboard),
                default_dashboard: string_or("AUTH_DEFAULT_DASHBOARD", defaults.auth.default_dashboard),
            },
        }
    }
}
