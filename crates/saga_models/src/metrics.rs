//! Metrics for model gateway calls.
//!
//! Instruments are registered against the global OpenTelemetry meter
//! provider. Without an installed exporter they are no-ops.
//!
//! Every call is tagged with its `outcome` ("ok" or a failure class) and
//! with how deep into a story it was made, measured as the number of
//! assistant turns already present in the request context. Session ids are
//! kept out of the label set so cardinality stays bounded by model count.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use saga_core::{GenerateRequest, Role, TokenUsage};
use saga_error::GatewayErrorKind;
use std::sync::OnceLock;
use std::time::Duration;

static METRICS: OnceLock<GatewayMetrics> = OnceLock::new();

/// Story depths above this share one `depth` label value.
const MAX_DEPTH_LABEL: usize = 16;

/// Result of one gateway call as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// A completion came back
    Ok,
    /// The call failed with the given failure class
    Failed(&'static str),
}

impl CallOutcome {
    /// Outcome for a failed call.
    pub fn failed(kind: &GatewayErrorKind) -> Self {
        Self::Failed(classify_error(kind))
    }

    /// Label value for the `outcome` dimension.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Failed(class) => class,
        }
    }
}

/// Shape of the conversation a gateway call carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryContext {
    /// Messages sent, system role included
    pub messages: usize,
    /// Assistant turns already in the context
    pub depth: usize,
}

impl StoryContext {
    /// Measure a request before it is sent.
    pub fn of(request: &GenerateRequest) -> Self {
        let messages = request.messages();
        Self {
            messages: messages.len(),
            depth: messages.iter().filter(|m| m.role == Role::Assistant).count(),
        }
    }

    /// Label value for the `depth` dimension.
    pub fn depth_label(&self) -> String {
        if self.depth > MAX_DEPTH_LABEL {
            format!("{}+", MAX_DEPTH_LABEL)
        } else {
            self.depth.to_string()
        }
    }
}

/// Instruments for model gateway traffic.
#[derive(Clone)]
pub struct GatewayMetrics {
    calls: Counter<u64>,
    latency: Histogram<f64>,
    context_messages: Histogram<u64>,
    tokens: Counter<u64>,
}

impl GatewayMetrics {
    fn init() -> Self {
        let meter = global::meter("saga_gateway");

        Self {
            calls: meter
                .u64_counter("saga.gateway.calls")
                .with_description("Gateway calls by outcome and story depth")
                .build(),
            latency: meter
                .f64_histogram("saga.gateway.latency")
                .with_unit("s")
                .with_description("Gateway call latency by outcome")
                .build(),
            context_messages: meter
                .u64_histogram("saga.gateway.context.messages")
                .with_description("Messages sent per gateway call")
                .build(),
            tokens: meter
                .u64_counter("saga.gateway.tokens")
                .with_description("Tokens reported by the provider, split by direction")
                .build(),
        }
    }

    /// Get the process-wide metrics instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record one finished gateway call.
    pub fn record_call(
        &self,
        provider: &'static str,
        model: &str,
        context: StoryContext,
        outcome: CallOutcome,
        elapsed: Duration,
    ) {
        let model = KeyValue::new("model", model.to_string());
        let outcome = KeyValue::new("outcome", outcome.label());

        self.calls.add(
            1,
            &[
                KeyValue::new("provider", provider),
                model.clone(),
                outcome.clone(),
                KeyValue::new("depth", context.depth_label()),
            ],
        );
        self.latency.record(
            elapsed.as_secs_f64(),
            &[KeyValue::new("provider", provider), outcome],
        );
        self.context_messages
            .record(context.messages as u64, &[model]);
    }

    /// Record provider-reported token usage.
    pub fn record_usage(&self, model: &str, usage: &TokenUsage) {
        let model = KeyValue::new("model", model.to_string());
        self.tokens.add(
            u64::from(usage.prompt_tokens),
            &[model.clone(), KeyValue::new("direction", "prompt")],
        );
        self.tokens.add(
            u64::from(usage.completion_tokens),
            &[model, KeyValue::new("direction", "completion")],
        );
    }
}

/// Failure class of a gateway error, used as the `outcome` label.
pub fn classify_error(kind: &GatewayErrorKind) -> &'static str {
    match kind {
        GatewayErrorKind::Api { status: 429, .. } => "rate_limit",
        GatewayErrorKind::Api {
            status: 401 | 403, ..
        } => "auth",
        GatewayErrorKind::Api {
            status: 400..=499, ..
        } => "invalid_request",
        GatewayErrorKind::Api { .. } => "server",
        GatewayErrorKind::Http(_) => "network",
        GatewayErrorKind::Timeout(_) => "timeout",
        GatewayErrorKind::Deserialization(_) => "deserialization",
        GatewayErrorKind::EmptyCompletion => "empty_completion",
        GatewayErrorKind::Configuration(_) => "configuration",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saga_core::Message;

    fn api(status: u16) -> GatewayErrorKind {
        GatewayErrorKind::Api {
            status,
            message: String::new(),
        }
    }

    fn request(turns: usize) -> GenerateRequest {
        let mut messages = vec![Message::system("narrator")];
        for i in 0..turns {
            messages.push(Message::assistant(format!("RESPONSE: scene {}", i)));
            messages.push(Message::user("1"));
        }
        GenerateRequest::builder().messages(messages).build().unwrap()
    }

    #[test]
    fn test_classify_api_statuses() {
        assert_eq!(classify_error(&api(429)), "rate_limit");
        assert_eq!(classify_error(&api(401)), "auth");
        assert_eq!(classify_error(&api(403)), "auth");
        assert_eq!(classify_error(&api(404)), "invalid_request");
        assert_eq!(classify_error(&api(503)), "server");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(CallOutcome::Ok.label(), "ok");
        assert_eq!(
            CallOutcome::failed(&GatewayErrorKind::Timeout("60s".to_string())).label(),
            "timeout"
        );
        assert_eq!(
            CallOutcome::failed(&GatewayErrorKind::Http("refused".to_string())).label(),
            "network"
        );
        assert_eq!(
            CallOutcome::failed(&GatewayErrorKind::EmptyCompletion).label(),
            "empty_completion"
        );
    }

    #[test]
    fn test_story_context_counts_assistant_turns() {
        let opening = StoryContext::of(&request(0));
        assert_eq!(opening, StoryContext { messages: 1, depth: 0 });
        assert_eq!(opening.depth_label(), "0");

        let third = StoryContext::of(&request(3));
        assert_eq!(third, StoryContext { messages: 7, depth: 3 });
        assert_eq!(third.depth_label(), "3");
    }

    #[test]
    fn test_depth_label_is_capped() {
        let deep = StoryContext { messages: 41, depth: 20 };
        assert_eq!(deep.depth_label(), "16+");
        let edge = StoryContext { messages: 33, depth: 16 };
        assert_eq!(edge.depth_label(), "16");
    }

    #[test]
    fn test_metrics_without_exporter_are_noops() {
        let metrics = GatewayMetrics::get();
        let context = StoryContext::of(&request(2));
        metrics.record_call("mock", "mock-model", context, CallOutcome::Ok, Duration::from_millis(10));
        metrics.record_call(
            "mock",
            "mock-model",
            context,
            CallOutcome::Failed("timeout"),
            Duration::from_secs(60),
        );
        metrics.record_usage(
            "mock-model",
            &TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            },
        );
    }
}
