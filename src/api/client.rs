use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use super::types::{Answer, AskRequest};
use crate::config::Config;
use crate::http::{ApiError, HttpClient};

pub const ASK_PATH: &str = "/api/ask";
pub const HEALTH_PATH: &str = "/api/health";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AskService: Send + Sync {
    /// Sends a question and returns the service's answer.
    async fn ask(&self, question: &str) -> Result<Answer, ApiError>;
    /// Succeeds when the service is reachable and live.
    async fn health(&self) -> Result<(), ApiError>;
    fn base_url(&self) -> &str;
}

pub struct CopilotClient {
    http: HttpClient,
}

impl CopilotClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Builds a client from resolved configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = config.build_client()?;
        Ok(Self::new(HttpClient::new(client, config.base_url.clone())))
    }
}

#[async_trait]
impl AskService for CopilotClient {
    #[tracing::instrument(skip(self))]
    async fn ask(&self, question: &str) -> Result<Answer, ApiError> {
        debug!("Asking {}...", self.http.url(ASK_PATH));

        let body = self
            .http
            .post_json(ASK_PATH, &AskRequest { question })
            .await?;

        let answer = Answer::from_body(body.as_ref());
        debug!("Received answer from model {:?}", answer.model);
        Ok(answer)
    }

    #[tracing::instrument(skip(self))]
    async fn health(&self) -> Result<(), ApiError> {
        self.http.get(HEALTH_PATH).await.map(|_| ())
    }

    fn base_url(&self) -> &str {
        self.http.base_url()
    }
}
