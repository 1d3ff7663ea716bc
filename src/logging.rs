//! Logging infrastructure - structured tracing for callback registration
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Configurable log level, overridable through `RUST_LOG`
//! - Zero-cost when disabled
//! - Optional JSON output and daily-rotated log files

use once_cell::sync::OnceCell;
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Global logging state (holds the file writer guard, if any)
static LOGGER_INITIALIZED: OnceCell<Option<WorkerGuard>> = OnceCell::new();

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Log file (rotated daily) in addition to stderr
    pub log_path: Option<PathBuf>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create debug config (verbose logging)
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            show_spans: true,
            ..Self::default()
        }
    }
}

/// Parse a level name, falling back to INFO
pub fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize logging with default configuration
pub fn init() {
    init_with_config(LogConfig::default());
}

/// Initialize logging with custom configuration (first call wins)
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "ffi_callbacks={}",
                config.level.as_str().to_lowercase()
            ))
        });

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let console = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_span_events(span_events.clone())
                .with_target(true)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(io::stderr)
                .with_span_events(span_events.clone())
                .with_target(true)
                .with_thread_ids(cfg!(debug_assertions))
                .with_line_number(cfg!(debug_assertions))
                .boxed()
        };

        let (file, guard) = match &config.log_path {
            Some(path) => {
                let directory = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| PathBuf::from("."));
                let prefix = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "ffi_callbacks.log".to_string());
                let appender = tracing_appender::rolling::daily(directory, prefix);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_span_events(span_events)
                    .boxed();
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        // Another subscriber may already be installed (e.g. by a host or a test)
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(console)
            .with(file)
            .try_init();

        guard
    });
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

// ============================================================================
// Callback-specific logging functions
// ============================================================================

/// Log runtime group creation
pub fn log_runtime_group_created(registry_capacity: usize, nursery_size: usize) {
    use tracing::info;
    info!(
        event = "runtime_group_created",
        registry_capacity,
        nursery_size,
        "Runtime group created"
    );
}

/// Log lazy creation of the callback registry
pub fn log_registry_created(capacity: usize) {
    use tracing::debug;
    debug!(
        event = "registry_created",
        capacity,
        "FFI callback registry allocated"
    );
}

/// Log a freshly synthesized trampoline
pub fn log_trampoline_synthesized(name: &str, target: &str, signature: &str) {
    use tracing::debug;
    debug!(
        event = "trampoline_synthesized",
        trampoline = name,
        callee = target,
        signature,
        "FFI callback trampoline synthesized"
    );
}

/// Log a registration that resolved to an existing trampoline
pub fn log_registry_hit(name: &str, entries: usize) {
    use tracing::trace;
    trace!(
        event = "registry_hit",
        trampoline = name,
        entries,
        "Reusing registered FFI callback trampoline"
    );
}

/// Log a registration that added a new trampoline
pub fn log_registry_insert(name: &str, entries: usize) {
    use tracing::debug;
    debug!(
        event = "registry_insert",
        trampoline = name,
        entries,
        "Registered FFI callback trampoline"
    );
}

/// Log promotion of an exceptional return value to old space
pub fn log_exceptional_return_promoted(value: &str) {
    use tracing::trace;
    trace!(
        event = "exceptional_return_promoted",
        value,
        "Copied exceptional return value to old space"
    );
}

/// Log a new-space request served from old space
pub fn log_pretenured(size: usize, nursery_used: usize) {
    use tracing::debug;
    debug!(
        event = "pretenured",
        size_bytes = size,
        nursery_used,
        "Nursery exhausted, allocating in old space"
    );
}

/// Log a nursery reset
pub fn log_scavenge(objects: usize, bytes: usize) {
    use tracing::debug;
    debug!(
        event = "scavenge",
        objects,
        bytes,
        "Nursery budget released"
    );
}

/// Log a fatal contract violation
pub fn log_contract_violation(message: &str) {
    use tracing::error;
    error!(
        event = "contract_violation",
        error = message,
        "Contract violation"
    );
}

/// Performance tracking utilities
pub mod perf {
    use std::time::Instant;
    use tracing::debug;

    /// Track operation duration (returns guard that logs on drop)
    #[must_use]
    pub fn track(operation: &'static str) -> PerformanceGuard {
        PerformanceGuard {
            operation,
            start: Instant::now(),
        }
    }

    pub struct PerformanceGuard {
        operation: &'static str,
        start: Instant,
    }

    impl Drop for PerformanceGuard {
        fn drop(&mut self) {
            let elapsed = self.start.elapsed();
            debug!(
                operation = self.operation,
                duration_us = elapsed.as_micros() as u64,
                "operation completed"
            );
        }
    }
}
