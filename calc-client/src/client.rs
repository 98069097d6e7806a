//! Arithmetic service client.

use async_trait::async_trait;

use calc_core::{ClientError, Operation, OperationRequest, OperationResponse};

use crate::config::ClientConfig;

/// Remote arithmetic operations over decimal strings.
#[async_trait]
pub trait ArithmeticClient: Send + Sync {
    async fn add(&self, a: &str, b: &str) -> Result<String, ClientError>;

    async fn subtract(&self, a: &str, b: &str) -> Result<String, ClientError>;

    async fn multiply(&self, a: &str, b: &str) -> Result<String, ClientError>;

    async fn divide(&self, a: &str, b: &str) -> Result<String, ClientError>;

    async fn power(&self, a: &str, b: &str) -> Result<String, ClientError>;

    async fn percentage(&self, a: &str, b: &str) -> Result<String, ClientError>;

    async fn sqrt(&self, a: &str) -> Result<String, ClientError>;

    /// Dispatch by operation. `b` is ignored for square root.
    async fn call(&self, op: Operation, a: &str, b: &str) -> Result<String, ClientError> {
        match op {
            Operation::Add => self.add(a, b).await,
            Operation::Subtract => self.subtract(a, b).await,
            Operation::Multiply => self.multiply(a, b).await,
            Operation::Divide => self.divide(a, b).await,
            Operation::Power => self.power(a, b).await,
            Operation::Percentage => self.percentage(a, b).await,
            Operation::Sqrt => self.sqrt(a).await,
        }
    }
}

/// [`ArithmeticClient`] speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpArithmeticClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpArithmeticClient {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Service base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, op: Operation, body: OperationRequest) -> Result<String, ClientError> {
        let url = format!("{}/{}", self.base_url, op.path());
        tracing::debug!(%url, a = %body.a, b = ?body.b, "Calling arithmetic service");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        // Failures arrive as 400 with an `error` body; decode regardless of status.
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let parsed: OperationResponse = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(%status, "Undecodable response from {}: {}", url, e);
            ClientError::Decode(format!("Invalid response from service ({})", status))
        })?;

        parsed.into_result()
    }
}

#[async_trait]
impl ArithmeticClient for HttpArithmeticClient {
    async fn add(&self, a: &str, b: &str) -> Result<String, ClientError> {
        self.post(Operation::Add, OperationRequest::binary(a, b)).await
    }

    async fn subtract(&self, a: &str, b: &str) -> Result<String, ClientError> {
        self.post(Operation::Subtract, OperationRequest::binary(a, b))
            .await
    }

    async fn multiply(&self, a: &str, b: &str) -> Result<String, ClientError> {
        self.post(Operation::Multiply, OperationRequest::binary(a, b))
            .await
    }

    async fn divide(&self, a: &str, b: &str) -> Result<String, ClientError> {
        self.post(Operation::Divide, OperationRequest::binary(a, b))
            .await
    }

    async fn power(&self, a: &str, b: &str) -> Result<String, ClientError> {
        self.post(Operation::Power, OperationRequest::binary(a, b))
            .await
    }

    async fn percentage(&self, a: &str, b: &str) -> Result<String, ClientError> {
        self.post(Operation::Percentage, OperationRequest::binary(a, b))
            .await
    }

    async fn sqrt(&self, a: &str) -> Result<String, ClientError> {
        self.post(Operation::Sqrt, OperationRequest::unary(a)).await
    }
}
