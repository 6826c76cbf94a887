use indicatif::{ProgressBar, ProgressStyle};
use console::style;
use crate::pipeline::ComparisonEvent;

/// Progress bar for a benchmark run, driven by orchestrator events.
pub struct BenchmarkProgress {
    bar: ProgressBar,
    failures: usize,
}

impl BenchmarkProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:30.cyan/dark_gray} {pos}/{len} contracts | {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Self { bar, failures: 0 }
    }

    pub fn handle_event(&mut self, event: &ComparisonEvent) {
        match event {
            ComparisonEvent::BenchmarkStarted { total, tools } => {
                self.bar.set_length(*total as u64);
                self.bar.set_message(format!("tools: {}", tools.join(", ")));
            }
            ComparisonEvent::ContractStarted { contract } => {
                self.bar.set_message(contract.clone());
            }
            ComparisonEvent::ToolFinished { contract, tool, success: false, .. } => {
                self.failures += 1;
                self.bar.println(format!(
                    "  {} {} failed on {}",
                    style("✗").red(), tool, contract
                ));
            }
            ComparisonEvent::ContractCompleted { .. } => {
                self.bar.inc(1);
            }
            ComparisonEvent::BenchmarkCompleted { contracts } => {
                self.bar.finish_with_message(format!(
                    "{} contracts analyzed, {} tool failures",
                    contracts, self.failures
                ));
            }
            _ => {}
        }
    }
}

impl Default for BenchmarkProgress {
    fn default() -> Self {
        Self::new()
    }
}
