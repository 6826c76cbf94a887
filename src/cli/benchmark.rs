use std::path::Path;

use console::style;
use tokio::sync::mpsc;
use crate::cli::commands::BenchmarkArgs;
use crate::cli::progress::BenchmarkProgress;
use crate::dataset::load_dataset;
use crate::errors::ContractBenchError;
use crate::pipeline::ComparisonEvent;
use crate::reporting::formatter::{format_benchmark_table, format_detection_rates};

pub async fn handle_benchmark(args: BenchmarkArgs, config_path: Option<&Path>) -> Result<(), ContractBenchError> {
    let contracts = load_dataset(&args.dataset).await?;
    if contracts.is_empty() {
        return Err(ContractBenchError::Config(format!(
            "Dataset {} contains no contracts",
            args.dataset.display()
        )));
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let orchestrator = super::build_orchestrator(config_path).await?.with_event_channel(tx);

    let progress_task = tokio::spawn(async move {
        let mut progress = BenchmarkProgress::new();
        while let Some(event) = rx.recv().await {
            progress.handle_event(&event);
            if matches!(event, ComparisonEvent::BenchmarkCompleted { .. }) {
                break;
            }
        }
    });

    let metrics = orchestrator.benchmark_tools(&contracts, args.tools.as_deref()).await?;
    let _ = progress_task.await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("\n{}", format_benchmark_table(&metrics));
        let rates = format_detection_rates(&metrics);
        if !rates.is_empty() {
            println!("## Detection rates by type\n\n{}", rates);
        }
    }

    if let Some(dest) = &args.export {
        let written = orchestrator.export_results(dest, args.format).await?;
        eprintln!("{} Exported {} records to {}", style("✓").green(), written, dest.display());
    }
    Ok(())
}
