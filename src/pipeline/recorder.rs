use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::adapters::ToolAdapter;
use crate::errors::ContractBenchError;
use crate::models::ToolPerformance;

/// Runs one adapter call and turns every outcome into a [`ToolPerformance`].
///
/// Errors, panics and timeouts all become failed performances; nothing an
/// adapter does escapes this boundary.
#[derive(Debug, Clone)]
pub struct PerformanceRecorder {
    timeout: Duration,
}

impl PerformanceRecorder {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn record(
        &self,
        adapter: &dyn ToolAdapter,
        source: &str,
        contract_name: &str,
    ) -> ToolPerformance {
        let tool = adapter.name();

        if !adapter.is_available() {
            let err = ContractBenchError::AdapterUnavailable(format!("{} is not available", tool));
            warn!(tool = %tool, contract = %contract_name, "Skipping unavailable tool");
            return ToolPerformance::failed(tool, Duration::ZERO, err.to_string());
        }

        debug!(tool = %tool, kind = %adapter.kind(), contract = %contract_name, "Running tool");
        let start = Instant::now();
        let call = AssertUnwindSafe(adapter.analyze(source, contract_name)).catch_unwind();
        let outcome = tokio::time::timeout(self.timeout, call).await;
        let elapsed = start.elapsed();
        let duration_ms = elapsed.as_millis() as u64;

        match outcome {
            Ok(Ok(Ok(findings))) => {
                info!(
                    tool = %tool,
                    contract = %contract_name,
                    duration_ms,
                    findings = findings.len(),
                    "Tool completed"
                );
                ToolPerformance::succeeded(tool, elapsed, findings)
            }
            Ok(Ok(Err(e))) => {
                let class = e.classify();
                warn!(
                    tool = %tool,
                    contract = %contract_name,
                    duration_ms,
                    error_type = class.error_type,
                    error = %e,
                    "Tool failed"
                );
                ToolPerformance::failed(tool, elapsed, e.to_string())
            }
            Ok(Err(payload)) => {
                let message = panic_message(payload.as_ref());
                warn!(tool = %tool, contract = %contract_name, duration_ms, error = %message, "Tool panicked");
                ToolPerformance::failed(tool, elapsed, format!("Tool panicked: {}", message))
            }
            Err(_) => {
                let message = format!("Timed out after {}s", self.timeout.as_secs_f64());
                warn!(tool = %tool, contract = %contract_name, duration_ms, "Tool timed out");
                ToolPerformance::failed(tool, elapsed, message)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
