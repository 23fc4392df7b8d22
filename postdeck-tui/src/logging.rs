use log::LevelFilter;
use simplelog::*;
use std::fs::File;
use std::path::PathBuf;

/// Logging configuration for the postdeck TUI
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Master switch to enable/disable all logging
    pub enabled: bool,
    /// Path to the log file
    pub log_file: PathBuf,
    /// Whether to clear the log file on startup
    pub clear_on_startup: bool,
    /// Feature flags for specific logging categories
    pub features: LogFeatures,
    /// Overall log level
    pub level: LevelFilter,
}

/// Feature flags for specific logging categories
#[derive(Debug, Clone)]
pub struct LogFeatures {
    /// Log view state transitions (Idle / Viewing / Expanded)
    pub transitions: bool,
    /// Log key and mouse events
    pub input: bool,
    /// Log rendering operations
    pub rendering: bool,
    /// Log post and avatar fetches
    pub fetch: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: PathBuf::from("postdeck.log"),
            clear_on_startup: true,
            features: LogFeatures::default(),
            level: LevelFilter::Info,
        }
    }
}

impl Default for LogFeatures {
    fn default() -> Self {
        Self {
            transitions: true,
            input: false,
            rendering: false,
            fetch: true,
        }
    }
}

impl LogConfig {
    /// Create a new log configuration with all features disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Create a minimal log configuration (only errors and warnings)
    pub fn minimal() -> Self {
        Self {
            enabled: true,
            level: LevelFilter::Warn,
            features: LogFeatures {
                transitions: false,
                input: false,
                rendering: false,
                fetch: false,
            },
            ..Default::default()
        }
    }

    /// Create a verbose log configuration (all features enabled)
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            level: LevelFilter::Trace,
            features: LogFeatures {
                transitions: true,
                input: true,
                rendering: true,
                fetch: true,
            },
            ..Default::default()
        }
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    if !config.enabled {
        let _ = WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink());
        return Ok(());
    }

    if config.clear_on_startup {
        let _ = File::create(&config.log_file)?;
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|builder| builder)
        .build();

    WriteLogger::init(config.level, log_config, log_file)?;

    log::info!("Logging initialized: file={}, level={:?}", config.log_file.display(), config.level);
    log::debug!("Log features: {:?}", config.features);

    Ok(())
}

/// Macro for logging view state transitions
#[macro_export]
macro_rules! log_transition {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.transitions {
            log::debug!(target: "transitions", $($arg)*);
        }
    };
}

/// Macro for logging key and mouse events
#[macro_export]
macro_rules! log_input {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.input {
            log::debug!(target: "input", $($arg)*);
        }
    };
}

/// Macro for logging rendering operations
#[macro_export]
macro_rules! log_rendering {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.rendering {
            log::trace!(target: "rendering", $($arg)*);
        }
    };
}

/// Macro for logging fetches
#[macro_export]
macro_rules! log_fetch {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.fetch {
            log::info!(target: "fetch", $($arg)*);
        }
    };
}
