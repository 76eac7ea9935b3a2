use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::LOCATION};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::{Credentials, GraphConfig};
use crate::error::GraphError;
use crate::session::{RankingSession, SessionGuard, SessionOpener};

/// Items ranked by how many distinct customers bought them.
const RANKING_STATEMENT: &str = r#"MATCH (c:Customer)-[:PURCHASED]->(i:Item)
WITH i, count(DISTINCT c) AS score
WHERE score >= $minScore
RETURN i.id AS id
ORDER BY score DESC, id ASC
LIMIT $limit"#;

#[derive(Debug, Default, Deserialize)]
struct TransactionResponse {
    #[serde(default)]
    commit: Option<String>,
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<StatementError>,
}

#[derive(Debug, Default, Deserialize)]
struct StatementResult {
    #[serde(default)]
    data: Vec<ResultRow>,
}

#[derive(Debug, Default, Deserialize)]
struct ResultRow {
    #[serde(default)]
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct StatementError {
    code: String,
    message: String,
}

/// Opens explicit transactions on the Neo4j HTTP API. Each transaction acts
/// as one ranking session and is rolled back on close.
pub struct HttpSessionOpener {
    client: Client,
    config: GraphConfig,
}

impl HttpSessionOpener {
    pub fn new(config: GraphConfig) -> Result<Self, GraphError> {
        let client = Client::builder()
            .connect_timeout(config.query_timeout)
            .timeout(config.query_timeout)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn session(&self, transaction_url: String, credentials: Credentials<'_>) -> HttpRankingSession {
        HttpRankingSession {
            client: self.client.clone(),
            transaction_url,
            user: credentials.user.to_string(),
            password: credentials.password.to_string(),
        }
    }
}

#[async_trait]
impl SessionOpener for HttpSessionOpener {
    async fn open(&self) -> Result<Box<dyn RankingSession>, GraphError> {
        let credentials = self.config.credentials().ok_or(GraphError::NotConfigured)?;
        let begin_url = self.config.begin_url().ok_or(GraphError::NotConfigured)?;

        let response = self
            .client
            .post(&begin_url)
            .basic_auth(credentials.user, Some(credentials.password))
            .json(&json!({ "statements": [] }))
            .send()
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        check_status(response.status())?;

        // The transaction exists from here on.
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = response
            .json::<TransactionResponse>()
            .await
            .map_err(|e| GraphError::Query(e.to_string()));
        let known_url = match &body {
            Ok(body) => transaction_url(location.clone(), body.commit.clone()).ok(),
            Err(_) => location,
        };

        let opened = body.and_then(|body| {
            check_errors(&body.errors)?;
            known_url
                .clone()
                .ok_or_else(|| GraphError::Query("transaction location missing".to_string()))
        });

        match opened {
            Ok(transaction_url) => {
                tracing::debug!("Opened ranking session {}", transaction_url);
                Ok(Box::new(self.session(transaction_url, credentials)))
            }
            Err(err) => {
                if let Some(url) = known_url {
                    tracing::debug!("Discarding ranking session {} after failed open", url);
                    SessionGuard::new(Box::new(self.session(url, credentials)))
                        .release()
                        .await;
                }
                Err(err)
            }
        }
    }
}

pub struct HttpRankingSession {
    client: Client,
    transaction_url: String,
    user: String,
    password: String,
}

#[async_trait]
impl RankingSession for HttpRankingSession {
    async fn run_top_candidates(
        &self,
        limit: usize,
        min_score: i64,
    ) -> Result<Vec<String>, GraphError> {
        let response = self
            .client
            .post(&self.transaction_url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&ranking_request(limit, min_score))
            .send()
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        check_status(response.status())?;

        let body: TransactionResponse = response
            .json()
            .await
            .map_err(|e| GraphError::Query(e.to_string()))?;

        candidate_ids(body)
    }

    async fn close(&self) -> Result<(), GraphError> {
        let response = self
            .client
            .delete(&self.transaction_url)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        // An expired transaction is already gone.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status(response.status())?;

        tracing::debug!("Closed ranking session {}", self.transaction_url);
        Ok(())
    }
}

fn ranking_request(limit: usize, min_score: i64) -> Value {
    json!({
        "statements": [{
            "statement": RANKING_STATEMENT,
            "parameters": {
                "limit": limit,
                "minScore": min_score,
            },
        }]
    })
}

fn check_status(status: StatusCode) -> Result<(), GraphError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(GraphError::Authentication(status.as_u16()))
        }
        status if status.is_server_error() => Err(GraphError::Connection(format!(
            "server responded with {}",
            status
        ))),
        status if !status.is_success() => {
            Err(GraphError::Query(format!("server responded with {}", status)))
        }
        _ => Ok(()),
    }
}

fn check_errors(errors: &[StatementError]) -> Result<(), GraphError> {
    match errors.first() {
        Some(error) => Err(GraphError::Query(format!("{}: {}", error.code, error.message))),
        None => Ok(()),
    }
}

fn transaction_url(location: Option<String>, commit: Option<String>) -> Result<String, GraphError> {
    location
        .or_else(|| commit.map(|commit| commit.trim_end_matches("/commit").to_string()))
        .filter(|url| !url.is_empty())
        .ok_or_else(|| GraphError::Query("transaction location missing".to_string()))
}

fn candidate_ids(body: TransactionResponse) -> Result<Vec<String>, GraphError> {
    check_errors(&body.errors)?;

    let Some(result) = body.results.into_iter().next() else {
        return Ok(vec![]);
    };

    Ok(result
        .data
        .into_iter()
        .filter_map(|row| match row.row.into_iter().next() {
            Some(Value::String(id)) => Some(id),
            other => {
                tracing::debug!("Skipping ranking row without a string id: {:?}", other);
                None
            }
        })
        .collect())
}
