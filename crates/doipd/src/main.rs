// # doipd - DigitalOcean apex A-record daemon
//
// This is a thin integration layer: all reconciliation logic lives in
// doip-core. The daemon is responsible for:
// 1. Loading `../.env` (if present) into the environment
// 2. Reading configuration from environment variables
// 3. Initializing logging and the runtime
// 4. Wiring the ipinfo.io lookup and DigitalOcean provider into the updater
// 5. Polling until SIGINT/SIGTERM
//
// ## Configuration
//
// - `DO_TOKEN`: DigitalOcean API token (required)
// - `DO_DOMAIN`: domain whose apex "A" record is managed (required)
// - `IP_TOKEN`: ipinfo.io token (optional)
// - `POLL_INTERVAL`: seconds between passes (optional, default 3600)
// - `LOG_LEVEL`: trace, debug, info, warn or error (optional, default info)
//
// ## Example
//
// ```bash
// export DO_TOKEN=your_token
// export DO_DOMAIN=example.com
// export POLL_INTERVAL=900
//
// doipd
// ```

use anyhow::Result;
use doip_core::config::vars;
use doip_core::{FixedInterval, LogLevel, Updater, UpdaterConfig};
use doip_ip_ipinfo::IpInfoLookup;
use doip_provider_digitalocean::DigitalOceanProvider;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Path of the optional env file: `.env` one directory above `cwd`
fn env_file_path(cwd: &Path) -> PathBuf {
    cwd.join("..").join(".env")
}

/// The env file for `cwd`, if one exists
fn locate_env_file(cwd: &Path) -> Option<PathBuf> {
    let path = env_file_path(cwd);
    path.is_file().then_some(path)
}

/// Level used before the configuration is loaded
///
/// Falls back to info so that a bad `LOG_LEVEL` can itself be reported.
fn bootstrap_log_level() -> LogLevel {
    std::env::var(vars::LOG_LEVEL)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

fn main() -> ExitCode {
    // Variables already set in the environment take precedence over the file
    let env_file = std::env::current_dir()
        .ok()
        .and_then(|cwd| locate_env_file(&cwd));
    let env_file_result = env_file.as_deref().map(dotenvy::from_path);

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(bootstrap_log_level().as_tracing_level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    match (&env_file, env_file_result) {
        (Some(path), Some(Ok(()))) => info!("Loaded environment from {}", path.display()),
        (Some(path), Some(Err(e))) => {
            error!("Failed to load {}: {}", path.display(), e);
            return DaemonExitCode::ConfigError.into();
        }
        _ => {}
    }

    // Load configuration from environment
    let config = match UpdaterConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    info!("Starting doipd");
    info!(
        "Managing {}:@:A every {}s",
        config.domain, config.poll_interval_secs
    );

    // One task, one control flow
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: UpdaterConfig) -> Result<()> {
    let ip_lookup = IpInfoLookup::new(config.ip_token.clone())?;
    let provider = DigitalOceanProvider::new(config.do_token.clone())?;
    let updater = Updater::new(Box::new(ip_lookup), Box::new(provider), &config)?;

    let mut schedule = FixedInterval::new(config.poll_interval());

    tokio::select! {
        passes = updater.run(&mut schedule) => {
            info!("Polling stopped after {} pass(es)", passes);
        }
        received = wait_for_shutdown() => {
            info!("Received shutdown signal: {}", received?);
            info!("Shutting down daemon");
        }
    }

    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_file_is_one_directory_up() {
        let path = env_file_path(Path::new("/srv/app/run"));
        assert_eq!(path, Path::new("/srv/app/run/../.env"));
    }

    #[test]
    fn locates_existing_env_file() {
        let root = tempfile::tempdir().unwrap();
        let cwd = root.path().join("run");
        std::fs::create_dir(&cwd).unwrap();
        assert_eq!(locate_env_file(&cwd), None);

        std::fs::write(
            root.path().join(".env"),
            "DO_TOKEN=file-token\nDO_DOMAIN=example.com\nPOLL_INTERVAL=60\n",
        )
        .unwrap();

        let found = locate_env_file(&cwd).expect("env file found");
        let pairs: Vec<(String, String)> = dotenvy::from_path_iter(&found)
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        let config = UpdaterConfig::from_vars(|name| {
            pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
        })
        .unwrap();

        assert_eq!(config.do_token, "file-token");
        assert_eq!(config.domain, "example.com");
        assert_eq!(config.poll_interval_secs, 60);
    }

    #[test]
    fn env_file_directory_is_ignored() {
        let root = tempfile::tempdir().unwrap();
        let cwd = root.path().join("run");
        std::fs::create_dir(&cwd).unwrap();
        std::fs::create_dir(root.path().join(".env")).unwrap();

        assert_eq!(locate_env_file(&cwd), None);
    }
}
