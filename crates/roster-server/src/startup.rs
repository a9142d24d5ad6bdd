//! Server startup utilities.

use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r#"
    ____             __               ________                __
   / __ \____  _____/ /____  _____   / ____/ /___  __  ______/ /
  / /_/ / __ \/ ___/ __/ _ \/ ___/  / /   / / __ \/ / / / __  /
 / _, _/ /_/ (__  ) /_/  __/ /     / /___/ / /_/ / /_/ / /_/ /
/_/ |_|\____/____/\__/\___/_/      \____/_/\____/\__,_/\__,_/
    "#
    );
}

/// Prints server startup information.
pub fn print_startup_info(host: &str, port: u16) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}:{}/api/users", host, port);
    info!("Health:    http://{}:{}/health", host, port);
    info!("{}", separator);
}
