//! Trait definitions for model backends.

use crate::HealthStatus;
use async_trait::async_trait;
use saga_core::{GenerateRequest, GenerateResponse};
use saga_error::SagaResult;
use std::sync::Arc;

/// Core trait that every model backend implements.
///
/// A driver is stateless from the caller's point of view: the full
/// conversation travels in every request. Implementations perform exactly one
/// attempt per call and report failures as gateway errors.
#[async_trait]
pub trait SagaDriver: Send + Sync {
    /// Generate one text completion for the given messages.
    async fn generate(&self, req: &GenerateRequest) -> SagaResult<GenerateResponse>;

    /// Provider name (e.g., "openai", "mock").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-3.5-turbo").
    fn model_name(&self) -> &str;
}

/// Trait for backends that support health checks.
#[async_trait]
pub trait Health: SagaDriver {
    /// Check if the backend is available and functioning.
    async fn health(&self) -> SagaResult<HealthStatus>;
}

#[async_trait]
impl<D: SagaDriver + ?Sized> SagaDriver for Arc<D> {
    async fn generate(&self, req: &GenerateRequest) -> SagaResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<D: Health + ?Sized> Health for Arc<D> {
    async fn health(&self) -> SagaResult<HealthStatus> {
        (**self).health().await
    }
}
