use anyhow::Result;
use tokio::io::AsyncBufReadExt;

use buildlog::config::{self, Config};
use buildlog::logger::BuildLogger;

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so they never mix with logged stdout output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "buildlog=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load()?;
    if let Some(path) = std::env::args().nth(1) {
        config.log_file = path.into();
    }
    config::ensure_directories(&config)?;

    let (logger, readiness) = BuildLogger::new(&config.log_file);
    readiness.wait().await?;

    tracing::debug!("logging to {}", config.log_file.display());

    // Pump stdin into the logger until EOF
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        logger.log(&line);
    }
    logger.shutdown().await;

    Ok(())
}
