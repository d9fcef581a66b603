//! Structured logging setup for dfdgen
//!
//! Logs always go to stderr so stdout carries only the generated report.
//! The minimum level comes from the CLI or `DFDGEN_LOG_LEVEL`, and `RUST_LOG`
//! still applies on top for fine-grained filtering.
//!
//! # Example
//!
//! ```no_run
//! use dfdgen::util::logging;
//!
//! logging::init_from_env();
//!
//! tracing::info!(repo = "https://github.com/acme/shop", "Fetching repository tree");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level for dfdgen's own targets
    pub level: Level,

    /// Emit one JSON object per event instead of console text
    pub use_json: bool,

    /// Include the module target (e.g. dfdgen::tools) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            use_json: false,
            include_target: true,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with source locations, for log collectors
    pub fn json(level: Level) -> Self {
        Self {
            level,
            use_json: true,
            include_target: true,
            include_location: true,
        }
    }
}

/// Parses a log level, falling back to WARN for unknown input
///
/// ```
/// use dfdgen::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("chatty"), Level::WARN);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    level_from_str(level_str).unwrap_or_else(|| {
        eprintln!(
            "Invalid log level '{}', defaulting to WARN. Valid levels: trace, debug, info, warn, error",
            level_str
        );
        Level::WARN
    })
}

/// Strict form of [`parse_level`]: `None` for unknown names
pub fn level_from_str(level_str: &str) -> Option<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn build_filter(level: Level) -> EnvFilter {
    let mut filter = EnvFilter::from_default_env();

    let mut directives = vec![format!("dfdgen={}", level)];
    if env::var("RUST_LOG").is_err() {
        directives.extend(["genai=warn", "reqwest=warn", "hyper=warn"].map(String::from));
    }

    for directive in directives {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}

/// Reads `DFDGEN_LOG_LEVEL` and `DFDGEN_LOG_JSON`
pub fn config_from_env() -> LoggingConfig {
    let level = env::var("DFDGEN_LOG_LEVEL")
        .map(|l| parse_level(&l))
        .unwrap_or(Level::WARN);

    let use_json = env::var("DFDGEN_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    if use_json {
        LoggingConfig::json(level)
    } else {
        LoggingConfig::with_level(level)
    }
}

pub fn init_from_env() {
    init_logging(config_from_env());
}
