use std::path::PathBuf;
use std::sync::Arc;

use mlt_core::{MltError, Pass};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum AppError {
    #[error("核心库错误: {0}")]
    Mlt(Arc<MltError>),

    #[error("合成步骤 {pass} 失败: {source}")]
    Pass { pass: Pass, source: Arc<MltError> },

    #[error("IO 错误: {0}")]
    Io(Arc<std::io::Error>),

    #[error("JSON 序列化/反序列化错误: {0}")]
    Json(Arc<serde_json::Error>),

    #[error("找不到源文件: {0:?}")]
    SourceNotFound(PathBuf),

    #[error("未配置源文件路径，请使用 --source 或在配置文件中设置 source_path")]
    SourceNotConfigured,

    #[error("导出目录无效: {0}")]
    ExportFolder(String),

    #[error("没有可导出的内容")]
    EmptyOutput,
}

impl From<MltError> for AppError {
    fn from(err: MltError) -> Self {
        Self::Mlt(Arc::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(Arc::new(err))
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
