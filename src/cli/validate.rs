use crate::cli::commands::ValidateArgs;
use crate::config::parse_config;
use crate::errors::ContractBenchError;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), ContractBenchError> {
    let config = parse_config(&args.file).await?;
    let models = config.models();
    let settings = config.analysis_settings();
    println!("Configuration is valid: {}", args.file.display());
    println!("  models directory: {}", models.directory.display());
    println!("  timeout: {}s, max concurrency: {}", settings.timeout.as_secs(), settings.max_concurrency);
    println!("  external tools: {}", config.external_tools().len());
    Ok(())
}
