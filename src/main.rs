use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ocap_web::observability::logging;

#[derive(Parser)]
#[command(name = "ocap-web")]
#[command(version, about = "OCAP web service", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "OCAP_CONFIG", default_value = "setting.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing();

    tracing::info!("ocap-web v{} starting", env!("CARGO_PKG_VERSION"));

    match ocap_web::run(&cli.config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            ExitCode::FAILURE
        }
    }
}
