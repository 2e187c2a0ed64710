use clap::Parser;
use statementfinder::cli::Cli;
use statementfinder::config::AppConfig;
use statementfinder::logger::{AuditLogger, VerbosityLevel};
use statementfinder::pipeline;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Handle --init first (before any other processing)
    if cli.init {
        match AppConfig::create_default_config() {
            Ok(path) => {
                println!("✅ Created default configuration file at: {}", path.display());
                println!("   Edit this file to customize settings, then run statementfinder again.");
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("❌ Failed to create configuration file: {}", e);
                std::process::exit(1);
            }
        }
    }

    init_tracing(cli.verbose);

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let input_path = cli.input.clone().unwrap_or_else(|| config.input_path());
    let output_path = cli.output.clone().unwrap_or_else(|| config.output_path());

    let logger = AuditLogger::new(VerbosityLevel::from_verbose_count(cli.verbose));

    match pipeline::run(&config, &input_path, &output_path, &logger).await {
        Ok(path) => {
            logger.print_final_summary();
            println!("✅ Audit complete. Results written to: {}", path.display());
        }
        Err(e) => {
            logger.print_final_summary();
            eprintln!("❌ Audit failed: {:#}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Module-level diagnostics go through `tracing`; the verbosity flag maps to
/// a default filter that `RUST_LOG` can still override.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
