//! Function to setup logging in binaries.

/// Crates that are too chatty on `info`/`debug` for a command-line tool.
const LOUD_CRATES: [&str; 1] = [
    // `csv` reports every flexible record at debug level:
    "csv",
];

/// The filter used when `RUST_LOG` is not set.
///
/// Defaults to `info`, with crates that are loud at that level turned down to `warn`.
pub fn default_log_filter() -> String {
    std::iter::once("info".to_owned())
        .chain(LOUD_CRATES.iter().map(|loud_crate| format!("{loud_crate}=warn")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Directs [`log`] calls to stderr, honoring `RUST_LOG` when it is set.
///
/// Safe to call more than once: later calls are no-ops.
pub fn setup_logging() {
    let env = env_logger::Env::default().default_filter_or(default_log_filter());

    let result = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();

    if result.is_err() {
        log::debug!("A logger was already installed; keeping it");
    }
}
