use std::time::Duration;

pub const DEFAULT_DATABASE: &str = "neo4j";
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(1500);
pub const DEFAULT_MIN_SCORE: i64 = 1;

/// Connection settings for the graph ranking backend.
///
/// Every connection field is optional; a missing one leaves the backend
/// unconfigured and recommendations are served from the record store only.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: String,
    pub query_timeout: Duration,
    /// Minimum relevance a candidate needs to be returned.
    pub min_score: i64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: None,
            user: None,
            password: None,
            database: DEFAULT_DATABASE.to_string(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

/// Validated connection parameters.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub uri: &'a str,
    pub user: &'a str,
    pub password: &'a str,
}

impl GraphConfig {
    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }

    pub fn credentials(&self) -> Option<Credentials<'_>> {
        fn present(value: &Option<String>) -> Option<&str> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
        }

        let uri = present(&self.uri)?;
        if !(uri.starts_with("http://") || uri.starts_with("https://")) {
            return None;
        }

        Some(Credentials {
            uri: uri.trim_end_matches('/'),
            user: present(&self.user)?,
            password: present(&self.password)?,
        })
    }

    /// Endpoint that opens a new explicit transaction.
    pub fn begin_url(&self) -> Option<String> {
        self.credentials()
            .map(|credentials| format!("{}/db/{}/tx", credentials.uri, self.database))
    }
}
