//! Log macros and logger setup shared by the datacurve crates.
//!
//! Importing is lossy by nature: rows without a usable timestamp, fields that are
//! neither metric nor dimension, unreadable files. Those are reported here rather
//! than returned as errors.
//!
//! * `warn`: an input produced nothing usable, or was skipped
//! * `info`: a summary per command, e.g. how many rows were written
//! * `debug`: per-file import statistics
//! * `trace`: per-row detail such as an unparsable timestamp
//!
//! The `*_once` macros log each distinct message a single time per process.

mod result_extensions;
mod setup;

// Everything goes through `log`, so downstream binaries pick the backend.
pub use log::{debug, error, info, trace, warn};

// Similar to `info!` etc, but will only log each unique message once.
pub use log_once::{debug_once, warn_once};

pub use self::result_extensions::ResultExt;
pub use self::setup::{default_log_filter, setup_logging};
