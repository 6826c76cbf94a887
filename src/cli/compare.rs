use std::path::Path;

use console::style;
use tracing::info;
use crate::cli::commands::CompareArgs;
use crate::errors::ContractBenchError;
use crate::reporting::formatter::format_comparison_summary;

pub async fn handle_compare(args: CompareArgs, config_path: Option<&Path>) -> Result<(), ContractBenchError> {
    let source = tokio::fs::read_to_string(&args.file).await?;
    let name = args.name.clone().unwrap_or_else(|| {
        args.file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "contract".to_string())
    });

    let orchestrator = super::build_orchestrator(config_path).await?;
    info!(contract = %name, file = %args.file.display(), "Comparing tools");
    let result = orchestrator
        .compare_tools(&source, &name, args.ground_truth.clone(), args.tools.as_deref())
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_comparison_summary(&result));
    }

    if let Some(dest) = &args.export {
        let written = orchestrator.export_results(dest, args.format).await?;
        eprintln!(
            "{} Exported {} {} to {}",
            style("✓").green(),
            written,
            if args.format == crate::reporting::ExportFormat::Csv { "rows" } else { "results" },
            dest.display()
        );
    }
    Ok(())
}
