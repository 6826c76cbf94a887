use clap::Parser;
use contract_bench::cli;
use contract_bench::errors::ContractBenchError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    debug!(version = %contract_bench::build_info(), "Starting contract-bench");

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        cli::Commands::Tools(args) => cli::tools::handle_tools(args, config_path).await,
        cli::Commands::Compare(args) => cli::compare::handle_compare(args, config_path).await,
        cli::Commands::Benchmark(args) => cli::benchmark::handle_benchmark(args, config_path).await,
        cli::Commands::Validate(args) => cli::validate::handle_validate(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            ContractBenchError::Config(_) | ContractBenchError::Yaml(_) => 2,
            ContractBenchError::Io(_) => 3,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}
