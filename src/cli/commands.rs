//! CLI command implementations

use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::args::Command;
use super::errors::{CliError, CliResult};
use crate::config::ServiceConfig;
use crate::http_server::HttpServer;
use crate::service::ContentService;

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
    }
}

/// Write the default configuration to `config_path`.
///
/// Refuses to overwrite an existing file.
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::AlreadyInitialized {
            path: config_path.to_path_buf(),
        });
    }
    let write_error = |source| CliError::Write {
        path: config_path.to_path_buf(),
        source,
    };
    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    let text = serde_json::to_string_pretty(&ServiceConfig::default())?;
    fs::write(config_path, text).map_err(write_error)?;
    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}

/// Load the config, build the service and serve HTTP until failure
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = ServiceConfig::load(config_path)?;
    if let Some(port) = port {
        config.port = port;
    }

    let service = ContentService::from_config(&config)?;
    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Server)?;

    runtime
        .block_on(async move {
            let service = Arc::new(service);
            // Resolve the gate before accepting traffic
            service.ready().await;
            HttpServer::new(service, config).start().await
        })
        .map_err(CliError::Server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("pressroom.json");

        init(&path).unwrap();
        assert_eq!(ServiceConfig::load(&path).unwrap(), ServiceConfig::default());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pressroom.json");
        fs::write(&path, "{}").unwrap();

        let err = init(&path).unwrap_err();
        assert!(matches!(err, CliError::AlreadyInitialized { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_serve_rejects_malformed_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pressroom.json");
        fs::write(&path, "not json").unwrap();

        let err = serve(&path, None).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), 3);
    }
}
