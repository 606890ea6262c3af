use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use anyhow::{Context, Result, anyhow};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{self, RollingFileAppender},
};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};
use uuid::Uuid;

use crate::config::{LoggingConfig, LoggingRotation};

const LOG_FILE_PREFIX: &str = "jin.log";

/// Keeps the file writer alive. Dropping it flushes buffered log lines.
pub struct LoggingGuard {
    _worker_guard: WorkerGuard,
    run_id: String,
}

impl LoggingGuard {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

pub fn init_tracing(logging_config: &LoggingConfig) -> Result<LoggingGuard> {
    if logging_config.dir.as_os_str().is_empty() {
        return Err(anyhow!("logging.dir cannot be empty"));
    }
    let env_filter = build_env_filter(&logging_config.filter)?;

    let log_dir = absolute_dir(&logging_config.dir)?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create logging directory {}", log_dir.display()))?;
    let expired = purge_expired_logs(&log_dir, logging_config.retention_days, SystemTime::now());

    let appender: RollingFileAppender = match logging_config.rotation {
        LoggingRotation::Daily => rolling::daily(&log_dir, LOG_FILE_PREFIX),
        LoggingRotation::Hourly => rolling::hourly(&log_dir, LOG_FILE_PREFIX),
    };
    let (writer, worker_guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_current_span(true)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(env_filter);
    let stderr_layer = logging_config.stderr_warn_enabled.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(LevelFilter::WARN)
    });

    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    let run_id = Uuid::now_v7().to_string();
    tracing::info!(
        target: "logging",
        run_id = %run_id,
        dir = %log_dir.display(),
        filter = %logging_config.filter,
        rotation = ?logging_config.rotation,
        expired_files_removed = expired.removed,
        "logging_initialized"
    );
    for warning in expired.warnings {
        tracing::warn!(target: "logging", warning = %warning, "logging_retention_warning");
    }

    Ok(LoggingGuard {
        _worker_guard: worker_guard,
        run_id,
    })
}

fn build_env_filter(filter: &str) -> Result<EnvFilter> {
    if filter.trim().is_empty() {
        return Err(anyhow!("logging.filter cannot be empty"));
    }
    EnvFilter::try_new(filter).with_context(|| format!("failed to parse logging.filter '{filter}'"))
}

fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    Ok(std::env::current_dir()
        .context("failed to read current working directory for logging.dir")?
        .join(dir))
}

#[derive(Debug, Default)]
struct RetentionReport {
    removed: usize,
    warnings: Vec<String>,
}

/// Deletes `jin.log*` files last modified before the retention window.
fn purge_expired_logs(log_dir: &Path, retention_days: usize, now: SystemTime) -> RetentionReport {
    let mut report = RetentionReport::default();
    let window = Duration::from_secs(retention_days.saturating_mul(24 * 60 * 60) as u64);
    let cutoff = now.checked_sub(window).unwrap_or(SystemTime::UNIX_EPOCH);

    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(err) => {
            report
                .warnings
                .push(format!("failed to scan {}: {err}", log_dir.display()));
            return report;
        }
    };

    for entry in entries.flatten() {
        if !entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX) {
            continue;
        }
        let modified = entry
            .metadata()
            .ok()
            .filter(|metadata| metadata.is_file())
            .and_then(|metadata| metadata.modified().ok());
        let Some(modified) = modified else {
            continue;
        };
        if modified > cutoff {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => report.removed += 1,
            Err(err) => report.warnings.push(format!(
                "failed to remove expired log file {}: {err}",
                entry.path().display()
            )),
        }
    }
    report
}
