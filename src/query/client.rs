use crate::error::{AxtopError, AxtopResult};
use crate::query::{QueryRequest, QueryResult};
use crate::AxtopConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use tokio::time::Duration;
use tracing::{debug, warn};

const APL_PATH: &str = "/v1/datasets/_apl?format=legacy";
const ORG_ID_HEADER: &str = "X-Axiom-Org-Id";

/// Remote query transport. Takes an APL string and returns the raw result.
#[async_trait]
pub trait QueryClient: Send + Sync {
    async fn query(&self, apl: &str) -> AxtopResult<QueryResult>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `QueryClient` backed by the service's HTTP API.
pub struct HttpQueryClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpQueryClient {
    pub fn new(config: &AxtopConfig) -> AxtopResult<Self> {
        let token = config.token.as_deref().ok_or_else(|| AxtopError::Config {
            message: "AXIOM_TOKEN environment variable is required".to_string(),
        })?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| AxtopError::Config {
            message: "AXIOM_TOKEN contains invalid header characters".to_string(),
        })?;
        headers.insert(AUTHORIZATION, bearer);

        if let Some(org_id) = &config.org_id {
            let value = HeaderValue::from_str(org_id).map_err(|_| AxtopError::Config {
                message: "AXIOM_ORG_ID contains invalid header characters".to_string(),
            })?;
            headers.insert(ORG_ID_HEADER, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.query_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", config.url, APL_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QueryClient for HttpQueryClient {
    async fn query(&self, apl: &str) -> AxtopResult<QueryResult> {
        debug!("POST {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&QueryRequest::new(apl))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = api_error_message(&body);
            warn!("Query rejected with status {}: {}", status, message);
            return Err(AxtopError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.trim().to_string())
}
