use crate::utils::error::{Result, WatchError};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "compact" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("slot_notifier=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slot_notifier=info"))
    }
}

/// 每日一個檔案：infolog_YYYY-MM-DD.log / errorlog_YYYY-MM-DD.log
pub fn daily_log_paths(directory: &Path, day: chrono::NaiveDate) -> (std::path::PathBuf, std::path::PathBuf) {
    let stamp = day.format("%Y-%m-%d");
    (
        directory.join(format!("infolog_{}.log", stamp)),
        directory.join(format!("errorlog_{}.log", stamp)),
    )
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| WatchError::LoggerError {
            message: format!("cannot open {}: {}", path.display(), e),
        })
}

pub fn init_cli_logger(verbose: bool, format: LogFormat, log_dir: Option<&Path>) -> Result<()> {
    let (compact, json) = match format {
        LogFormat::Compact => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            ),
        ),
    };

    let (info_file, error_file) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let (info_path, error_path) = daily_log_paths(dir, chrono::Local::now().date_naive());
            let info_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(open_append(&info_path)?))
                .with_filter(LevelFilter::INFO);
            let error_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(open_append(&error_path)?))
                .with_filter(LevelFilter::ERROR);
            (Some(info_layer), Some(error_layer))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(compact)
        .with(json)
        .with(info_file)
        .with(error_file)
        .try_init()
        .map_err(|e| WatchError::LoggerError {
            message: e.to_string(),
        })
}
