use serde::Serialize;
use tracing::{error, info, warn};

use super::validation::ValidationResult;

/// Receives the outcome of every submit attempt.
pub trait SubmitSink<T>: Send + Sync {
    fn report(&self, result: &ValidationResult<T>);
}

impl<T, F> SubmitSink<T> for F
where
    F: Fn(&ValidationResult<T>) + Send + Sync,
{
    fn report(&self, result: &ValidationResult<T>) {
        (self)(result)
    }
}

/// Writes submit outcomes to the developer console as JSON, through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    pretty: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn encode(&self, payload: &impl Serialize) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(payload)
        } else {
            serde_json::to_string(payload)
        }
    }
}

impl<T> SubmitSink<T> for ConsoleSink
where
    T: Serialize,
{
    fn report(&self, result: &ValidationResult<T>) {
        let encoded = match result {
            ValidationResult::Valid(values) => self.encode(values),
            ValidationResult::Invalid(errors) => self.encode(errors),
        };
        match (result.is_valid(), encoded) {
            (true, Ok(payload)) => info!(target: "calmform::submit", "{payload}"),
            (false, Ok(payload)) => warn!(target: "calmform::submit", "{payload}"),
            (_, Err(err)) => {
                error!(target: "calmform::submit", error = %err, "failed to encode submit result")
            }
        }
    }
}
