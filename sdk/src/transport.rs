use std::sync::Arc;

use async_trait::async_trait;
pub use shardline_api::v1::Operation;
use shardline_api::v1::error::{ErrorCode, ErrorInfo};

/// Failure reported by a transport, passed through to callers untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct TransportError {
    pub code: ErrorCode,
    pub message: String,
}

impl TransportError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl From<ErrorInfo> for TransportError {
    fn from(info: ErrorInfo) -> Self {
        Self {
            code: info.code,
            message: info.message,
        }
    }
}

impl From<TransportError> for ErrorInfo {
    fn from(e: TransportError) -> Self {
        ErrorInfo::new(e.code, e.message)
    }
}

/// Executes one already-validated request against the service.
///
/// Implementations own networking, signing, retries and timeouts. The SDK only
/// awaits `execute`, so dropping the returned future is how an in-flight call
/// is abandoned.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        operation: Operation,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(
        &self,
        operation: Operation,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        (**self).execute(operation, body).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn execute(
        &self,
        operation: Operation,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        (**self).execute(operation, body).await
    }
}
