//! Logging setup shared by every pantry binary and test harness.

/// Initialize process-wide logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    logging::init(logging::LogFormat::from_env());
}

/// Subscriber configuration (filters, output format).
pub mod logging;

pub use logging::LogFormat;
