mod client;
mod driver;
mod error;
mod harness;
mod models;

use error::ConnectorError;
use harness::JobHarness;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "connector=info,finstat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let exit_code = match execute().await {
        Ok(summary) => {
            info!(
                "Run finished: {} ICOs requested, {} found, {} not found, {} over the API limit",
                summary.requested, summary.found, summary.failed, summary.dropped
            );
            0
        }
        Err(e) => {
            let code = e.exit_code();
            if code == error::EXIT_USER_ERROR {
                error!("{}", e);
            } else {
                error!("Unexpected error: {:?}", e);
            }
            code
        }
    };

    std::process::exit(exit_code);
}

async fn execute() -> Result<driver::RunSummary, ConnectorError> {
    let harness = JobHarness::from_env()?;
    driver::run(&harness).await
}
