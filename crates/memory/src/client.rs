use std::path::Path;

use {
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use membot_engine::{GatewayError, MemoryGateway, MemoryItem, MemoryUser, RetrievalQuery,
                    RetrievalScope};

use crate::config::MemoryServiceConfig;

/// REST client for the memory service.
pub struct MemoryServiceClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct MemorizeRequest<'a> {
    resource_url: String,
    modality: &'a str,
    user: &'a MemoryUser,
}

#[derive(Deserialize)]
struct MemorizeResponse {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct RetrieveRequest<'a> {
    queries: &'a [RetrievalQuery],
    #[serde(rename = "where")]
    scope: &'a RetrievalScope,
}

#[derive(Deserialize)]
struct RetrieveResponse {
    #[serde(default)]
    items: Vec<MemoryItem>,
}

/// Service self-description from `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
}

impl MemoryServiceClient {
    pub fn new(config: &MemoryServiceConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(config.request_timeout)
                .build()?,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Reachability probe; startup logs a warning when this fails but the
    /// engine starts regardless.
    pub async fn health(&self) -> Result<HealthReport, GatewayError> {
        self.http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| GatewayError::transport("health", e))?
            .json()
            .await
            .map_err(|e| GatewayError::malformed("health", e))
    }

    async fn post_json<T, R>(&self, path: &str, body: &T, context: &str) -> Result<R, GatewayError>
    where
        T: Serialize + Sync,
        R: serde::de::DeserializeOwned,
    {
        self.http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| GatewayError::transport(context, e))?
            .json()
            .await
            .map_err(|e| GatewayError::malformed(context, e))
    }
}

#[async_trait]
impl MemoryGateway for MemoryServiceClient {
    async fn memorize(
        &self,
        resource: &Path,
        modality: &str,
        user: &MemoryUser,
    ) -> Result<(), GatewayError> {
        let request = MemorizeRequest {
            resource_url: resource.display().to_string(),
            modality,
            user,
        };
        let response: MemorizeResponse = self
            .post_json("/api/v1/memory/memorize", &request, "memorize")
            .await?;
        debug!(user = %user.user_id, items = response.items.len(), "content memorized");
        Ok(())
    }

    async fn retrieve(
        &self,
        queries: &[RetrievalQuery],
        scope: &RetrievalScope,
    ) -> Result<Vec<MemoryItem>, GatewayError> {
        let request = RetrieveRequest { queries, scope };
        let response: RetrieveResponse = self
            .post_json("/api/v1/memory/retrieve", &request, "retrieve")
            .await?;
        debug!(user = %scope.user_id, items = response.items.len(), "memories retrieved");
        Ok(response.items)
    }
}
