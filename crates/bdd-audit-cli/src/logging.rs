//! Logging bootstrap for the command line tool.
//!
//! Scanners report skipped files through `tracing` warnings. Those land
//! on stderr so they never mix with the report tables on stdout, and
//! timestamps and targets are left out so warnings read as plain
//! diagnostics.

use tracing_subscriber::EnvFilter;

use crate::config::AuditConfig;

fn filter_from_config(config: &AuditConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Initialise the logging subsystem based on configuration.
///
/// The effective level comes from [`AuditConfig`]: `--log-level` wins
/// over `BDD_AUDIT_LOG_LEVEL`, which wins over the default of `warn`.
///
/// If a global subscriber is already set the call is a no-op; the first
/// subscriber wins, which is the expected behaviour in tests.
pub fn init_logging(config: &AuditConfig) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
