pub mod app_config;
pub mod cors_config;
pub mod database_config;
pub mod graph_config;
pub mod recommendation_config;
pub mod server_config;

/// Reads an environment variable and parses it, falling back to `default`
/// when the variable is unset or unparsable.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
