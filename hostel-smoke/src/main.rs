use clap::Parser;
use tracing::{debug, error};

use hostel_smoke::cli::Cli;
use hostel_smoke::logging::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }

    debug!("hostel-smoke starting");

    match cli.run().await {
        Ok(_) => debug!("hostel-smoke completed successfully"),
        Err(e) => {
            error!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}
