//! HTTP/JSON client for the remote formula engine.
//!
//! Speaks the engine's invoke protocol: one POST per operation under
//! `/invoke/{operation}`, success bodies `{"ok": ...}`, rejections carried
//! as `{"error": "..."}` with a non-2xx status. The client performs no
//! retries; transient failures are the caller's concern.

use std::time::Duration;

use async_trait::async_trait;
use formelbank_engine::wire::{
    BatchNamesRequest, CheckFormelRequest, EngineErrorResponse, EngineOkResponse,
    GetFormelRequest, RenderFormulaRequest, OP_CHECK_FORMEL, OP_EQUIVALENCE, OP_GET_FORMEL,
    OP_RENDER_FORMULA, OP_TRUTH_TABLE,
};
use formelbank_engine::{EngineError, EngineResult, FormulaEngine, SlotName};
use serde::Serialize;

pub const ENV_ENGINE_BASE_URL: &str = "FORMELBANK_ENGINE_URL";

const DEFAULT_ENGINE_BASE_URL: &str = "http://127.0.0.1:7117";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpEngineConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for HttpEngineConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var(ENV_ENGINE_BASE_URL)
                .unwrap_or_else(|_| DEFAULT_ENGINE_BASE_URL.to_owned()),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Platform capability handed to the client at construction. The state
/// machines behind the client never branch on environment detection; a
/// client built without engine access fails every call with
/// `EngineError::Unavailable` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineAvailability {
    blocked_reason: Option<String>,
}

impl EngineAvailability {
    pub fn available() -> Self {
        Self {
            blocked_reason: None,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            blocked_reason: Some(reason.into()),
        }
    }

    fn ensure(&self) -> EngineResult<()> {
        match self.blocked_reason.as_ref() {
            Some(reason) => Err(EngineError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpEngineClient {
    config: HttpEngineConfig,
    availability: EngineAvailability,
    client: reqwest::Client,
}

impl HttpEngineClient {
    pub fn new(config: HttpEngineConfig, availability: EngineAvailability) -> Self {
        Self {
            config,
            availability,
            client: reqwest::Client::new(),
        }
    }

    fn operation_url(&self, operation: &str) -> String {
        format!(
            "{}/invoke/{operation}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn invoke<Request: Serialize + Sync>(
        &self,
        operation: &str,
        request: &Request,
        reject: fn(String) -> EngineError,
    ) -> EngineResult<Option<String>> {
        self.availability.ensure()?;
        let response = self
            .client
            .post(self.operation_url(operation))
            .timeout(self.config.request_timeout)
            .json(request)
            .send()
            .await
            .map_err(|error| EngineError::Transport(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: EngineOkResponse = response
                .json()
                .await
                .map_err(|error| EngineError::Transport(error.to_string()))?;
            return Ok(body.ok);
        }

        let message = match response.json::<EngineErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("engine returned status {status}"),
        };
        tracing::debug!(operation, %message, "engine rejected call");
        Err(reject(message))
    }

    async fn invoke_expecting_text<Request: Serialize + Sync>(
        &self,
        operation: &str,
        request: &Request,
        reject: fn(String) -> EngineError,
    ) -> EngineResult<String> {
        match self.invoke(operation, request, reject).await? {
            Some(text) => Ok(text),
            None => Err(EngineError::Transport(format!(
                "engine response for {operation} carried no payload"
            ))),
        }
    }
}

#[async_trait]
impl FormulaEngine for HttpEngineClient {
    async fn render_formula(&self, name: &SlotName, input: &str) -> EngineResult<String> {
        let request = RenderFormulaRequest {
            name: name.clone(),
            input: input.to_owned(),
        };
        self.invoke_expecting_text(OP_RENDER_FORMULA, &request, EngineError::Parse)
            .await
    }

    async fn validate_formula(&self, name: &SlotName, input: &str) -> EngineResult<()> {
        let request = CheckFormelRequest {
            name: name.clone(),
            input: input.to_owned(),
        };
        self.invoke(OP_CHECK_FORMEL, &request, EngineError::Parse)
            .await
            .map(|_| ())
    }

    async fn fetch_formula(&self, name: &SlotName, symbolic: bool) -> EngineResult<String> {
        let request = GetFormelRequest {
            name: name.clone(),
            is_utf: symbolic,
        };
        self.invoke_expecting_text(OP_GET_FORMEL, &request, EngineError::FetchUnavailable)
            .await
    }

    async fn truth_table(&self, names: &[SlotName]) -> EngineResult<String> {
        let request = BatchNamesRequest {
            namen: names.to_vec(),
        };
        self.invoke_expecting_text(OP_TRUTH_TABLE, &request, EngineError::Engine)
            .await
    }

    async fn check_equivalence(&self, names: &[SlotName]) -> EngineResult<String> {
        let request = BatchNamesRequest {
            namen: names.to_vec(),
        };
        self.invoke_expecting_text(OP_EQUIVALENCE, &request, EngineError::Engine)
            .await
    }

    async fn health_check(&self) -> EngineResult<()> {
        self.availability.ensure()?;
        let url = format!("{}/health", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|error| EngineError::Transport(error.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(EngineError::Transport(format!(
                "engine health check returned status {}",
                response.status()
            )))
        }
    }
}
