use std::time::Duration;

use sentiment_core::{JobRequest, PredictiveAction, StatusSnapshot};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{ActionsResponse, StartAck};
use crate::{BackendError, FailureKind};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The three remote operations exposed by the analysis backend.
#[async_trait::async_trait]
pub trait JobBackend: Send + Sync {
    async fn start_job(&self, request: &JobRequest) -> Result<(), BackendError>;

    async fn read_status(&self) -> Result<StatusSnapshot, BackendError>;

    async fn generate_actions(&self) -> Result<Vec<PredictiveAction>, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    base_url: url::Url,
}

impl ReqwestBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        let mut base_url = url::Url::parse(&settings.base_url)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
        // Endpoints are joined relative to the base, which must end in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_response(response, true).await
    }
}

#[async_trait::async_trait]
impl JobBackend for ReqwestBackend {
    async fn start_job(&self, request: &JobRequest) -> Result<(), BackendError> {
        let ack: StartAck = self.post_json("api/run", request).await?;
        if ack.ok {
            Ok(())
        } else {
            Err(BackendError::new(
                FailureKind::Rejected,
                ack.error.unwrap_or_default(),
            ))
        }
    }

    async fn read_status(&self) -> Result<StatusSnapshot, BackendError> {
        let response = self
            .client
            .get(self.endpoint("api/status")?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_response(response, false).await
    }

    async fn generate_actions(&self) -> Result<Vec<PredictiveAction>, BackendError> {
        let reply: ActionsResponse = self
            .post_json("api/predictive", &serde_json::json!({}))
            .await?;
        if reply.ok {
            Ok(reply.actions.unwrap_or_default())
        } else {
            Err(BackendError::new(
                FailureKind::Rejected,
                reply.error.unwrap_or_default(),
            ))
        }
    }
}

/// Decodes a JSON body. With `accept_error_body`, a non-2xx response whose body
/// still has the expected shape (an `{ok: false, error}` acknowledgment) is decoded.
async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
    accept_error_body: bool,
) -> Result<T, BackendError> {
    let status = response.status();
    let http_error = || {
        BackendError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        )
    };
    if !status.is_success() && !accept_error_body {
        return Err(http_error());
    }
    match response.json::<T>().await {
        Ok(value) => Ok(value),
        Err(err) if err.is_decode() && !status.is_success() => Err(http_error()),
        Err(err) if err.is_decode() => {
            Err(BackendError::new(FailureKind::Decode, err.to_string()))
        }
        Err(err) => Err(map_reqwest_error(err)),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
