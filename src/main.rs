/*!
 * binfs Host - Main Entry Point
 *
 * Loads the asset bundle into memory, starts the companion process, and keeps
 * every supervised process under the shutdown hook.
 */

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use binfs::{init_tracing, BundleFS, FileSystem, ProcessSupervisor, RuntimeConfig, RuntimeError, ShutdownHook};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let config = RuntimeConfig::from_env().map_err(RuntimeError::from)?;

    init_tracing(config.trace_json);

    info!("binfs host starting...");
    info!("================================================");

    let supervisor = ProcessSupervisor::new();

    info!("Installing shutdown hook...");
    let _hook = ShutdownHook::install(supervisor.clone(), &config);

    info!(bundle = %config.bundle_path.display(), "Loading bundle...");
    let fs: Arc<dyn FileSystem> = match BundleFS::from_bundle(&config.bundle_path) {
        Ok(fs) => Arc::new(fs),
        Err(e) => {
            error!(error = %e, "Bundle load failed, stopping supervised processes");
            supervisor.terminate_all();
            return Err(RuntimeError::from(e).into());
        }
    };

    info!(filesystem = fs.name(), "Bundle filesystem ready");
    info!("================================================");
    info!("Press Ctrl+C to exit");

    loop {
        tokio::time::sleep(Duration::from_secs(30)).await;
        info!(tracked = supervisor.count(), "Host running");
    }
}
