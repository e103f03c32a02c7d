//! Boot — logging init, config load, one validation pass.

use std::path::Path;

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::CheckConfig;
use crate::validate::{self, ValidationReport};

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formatcheck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load config and run a single validation pass over it.
pub fn check(path: Option<&Path>) -> Result<ValidationReport, Box<dyn std::error::Error>> {
    info!("Starting formatcheck v{}", env!("CARGO_PKG_VERSION"));

    let config = CheckConfig::load(path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    info!(
        "Loaded configuration: data_format={}, resources_dir={}",
        config.format.data_format(),
        config.validator.resources_dir.display()
    );

    let report = validate::validate(&config.format, &config.validator.context());
    if report.is_valid() {
        info!("Configuration is valid");
    } else {
        warn!("Configuration has {} issue(s)", report.diagnostics().len());
    }
    Ok(report)
}

/// Print the report; true when the configuration is valid.
pub fn finish(report: ValidationReport) -> bool {
    println!("{}", report);
    match report.into_factory_config() {
        Some(config) => {
            info!(
                "Parser factory ready: parser_format={}, charset={}, max_data_len={}, archive_pattern={}",
                config.parser_format(),
                config.charset().name(),
                config.max_data_len(),
                config.archive_pattern().unwrap_or("-")
            );
            true
        }
        None => false,
    }
}
