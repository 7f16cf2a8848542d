use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::app_settings::AppSettings;

const LOG_FILE_PREFIX: &str = "markersynth.log";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// 命令行每多一个 `-v` 就提高一级，最多到 `trace`。
    #[must_use]
    pub fn raised_by(self, verbose: u8) -> Self {
        const ORDER: [LogLevel; 5] = [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ];
        let current = ORDER.iter().position(|l| *l == self).unwrap_or(2);
        ORDER[(current + usize::from(verbose)).min(ORDER.len() - 1)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub enable_file_log: bool,
    pub file_log_level: LogLevel,
    pub console_log_level: LogLevel,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            enable_file_log: false,
            file_log_level: LogLevel::Info,
            console_log_level: LogLevel::Warn,
        }
    }
}

fn get_log_dir() -> Result<PathBuf, String> {
    if let Some(dir) = AppSettings::config_dir() {
        let log_dir = dir.join("logs");
        if !log_dir.exists() {
            fs::create_dir_all(&log_dir)
                .map_err(|e| format!("无法创建日志目录 {log_dir:?}: {e}"))?;
        }
        Ok(log_dir)
    } else {
        let current_dir = PathBuf::from(".");
        eprintln!("无法获取项目日志目录，将尝试在当前目录创建日志: {current_dir:?}");
        Ok(current_dir)
    }
}

/// 初始化全局日志。
///
/// 控制台输出到 stderr，`RUST_LOG` 优先于配置。
/// 启用文件日志时按天滚动写入数据目录，返回的 guard 需要一直持有到程序退出。
pub fn init_global_logger(settings: &LogSettings, verbose: u8) -> Option<WorkerGuard> {
    let console_level = settings.console_log_level.raised_by(verbose);
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let mut guard = None;
    let file_layer = if settings.enable_file_log {
        match get_log_dir() {
            Ok(log_dir) => {
                let appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
                let (writer, worker_guard) = tracing_appender::non_blocking(appender);
                guard = Some(worker_guard);
                Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer)
                        .with_filter(EnvFilter::new(settings.file_log_level.to_string())),
                )
            }
            Err(e) => {
                eprintln!("获取日志目录失败: {e}。文件日志将被禁用。");
                None
            }
        }
    } else {
        None
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("日志记录器初始化失败: {e}");
        return None;
    }

    tracing::debug!(
        "日志记录器已初始化。控制台级别: {console_level}，文件日志: {}",
        settings.enable_file_log
    );
    guard
}
