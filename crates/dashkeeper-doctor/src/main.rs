//! Dashkeeper doctor entry point.
//!
//! Health check for a dashboard configuration directory: resolves the
//! directory to inspect, prints one status line per configuration, runs
//! validation over the required files, and exits non-zero when validation
//! fails so deployment scripts can gate on it.
//!
//! # Flow
//!
//! ```text
//! main()
//!  └─ resolve_app_dir()     -- DASHKEEPER_DIR, exe dir, cwd
//!  └─ ConfigManager::new()  -- loads or regenerates config_paths.json
//!  └─ build_report()        -- status table + validation summary
//!  └─ exit(1) when a required configuration is missing or denied
//! ```

use tracing::info;
use tracing_subscriber::EnvFilter;

use dashkeeper_core::ConfigManager;
use dashkeeper_doctor::report;

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app_dir = report::resolve_app_dir();
    if !app_dir.is_dir() {
        anyhow::bail!(
            "application directory {} does not exist (set {} to override)",
            app_dir.display(),
            report::APP_DIR_ENV
        );
    }
    info!("checking dashboard configuration in {}", app_dir.display());

    let manager = ConfigManager::new(&app_dir);
    let (text, passed) = report::build_report(&manager);
    print!("{text}");

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}
