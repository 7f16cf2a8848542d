use std::fs;
use std::path::{Path, PathBuf};

use mlt_core::{MarkerStore, MltError};
use mlt_processor::Document;

use crate::app_settings::AppSettings;
use crate::error::{AppError, AppResult};

/// 读取并解析工程文件。
pub fn load_document(path: &Path) -> AppResult<(String, Document)> {
    if !path.is_file() {
        tracing::error!("[IO] 源文件 {path:?} 不存在");
        return Err(AppError::SourceNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let document = Document::parse(&content)?;
    tracing::info!("[IO] 已加载工程文件 {path:?}");
    Ok((content, document))
}

/// 读取标记 JSON 文件。
pub fn load_markers(path: &Path) -> AppResult<MarkerStore> {
    let content = fs::read_to_string(path)?;
    let markers: MarkerStore = serde_json::from_str(&content)
        .map_err(|e| MltError::json_parse(e, format!("标记文件 {}", path.display())))?;
    tracing::info!("[IO] 从 {path:?} 加载了 {} 条标记", markers.len());
    Ok(MarkerStore::from_markers(markers.into_inner()))
}

pub fn save_markers(path: &Path, markers: &MarkerStore) -> AppResult<()> {
    let json_string = serde_json::to_string_pretty(markers)?;
    fs::write(path, json_string)?;
    tracing::info!("[IO] 已保存 {} 条标记到 {path:?}", markers.len());
    Ok(())
}

pub fn write_output(path: &Path, content: &str) -> AppResult<()> {
    fs::write(path, content)?;
    tracing::info!("[IO] 已写入 {path:?}");
    Ok(())
}

/// 把合成结果写到 `<export_folder>/<export_file_name>`。
///
/// 导出目录必须已存在，内容去除空白后不能为空。
pub fn export_document(settings: &AppSettings, content: &str) -> AppResult<PathBuf> {
    let folder = settings
        .export_folder
        .as_deref()
        .ok_or_else(|| AppError::ExportFolder("未设置导出目录".to_string()))?;
    if !folder.is_dir() {
        return Err(AppError::ExportFolder(format!("{} 不存在", folder.display())));
    }
    if content.trim().is_empty() {
        return Err(AppError::EmptyOutput);
    }

    let file_name = if settings.export_file_name.trim().is_empty() {
        crate::app_settings::DEFAULT_EXPORT_FILE_NAME
    } else {
        settings.export_file_name.as_str()
    };
    let target = folder.join(file_name);
    write_output(&target, content)?;
    Ok(target)
}
