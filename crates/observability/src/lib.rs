//! Tracing/logging setup shared by the rolegate binaries.

/// Initialize process-wide logging using `ROLEGATE_LOG_FORMAT` and `RUST_LOG`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}

/// Tracing configuration (filters, formatting).
pub mod tracing;

pub use self::tracing::LogFormat;
