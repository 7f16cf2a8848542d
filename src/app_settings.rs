use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use mlt_core::SynthesisOptions;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::logger::LogSettings;

const CONFIG_FILE_NAME: &str = "markersynth.json";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "exported_file.mlt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// 要处理的 Shotcut 工程文件。
    #[serde(alias = "shortcut")]
    pub source_path: Option<PathBuf>,
    pub export_folder: Option<PathBuf>,
    pub export_file_name: String,
    pub log_settings: LogSettings,
    pub synthesis: SynthesisOptions,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            source_path: None,
            export_folder: None,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            log_settings: LogSettings::default(),
            synthesis: SynthesisOptions::default(),
        }
    }
}

impl AppSettings {
    pub fn config_dir() -> Option<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "MarkerSynth", "MarkerSynth") {
            let config_dir = proj_dirs.data_dir();
            if !config_dir.exists() {
                if let Err(e) = fs::create_dir_all(config_dir) {
                    tracing::error!("无法创建配置目录 {config_dir:?}: {e}");
                    return None;
                }
            }
            Some(config_dir.to_path_buf())
        } else {
            tracing::error!("无法获取项目配置目录路径。");
            None
        }
    }

    pub fn default_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// 从指定路径或默认位置加载配置。
    ///
    /// 文件不存在时写入并返回默认配置；文件无法读取或解析时返回默认配置，
    /// 不会覆盖原文件。
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_config_path) else {
            return Self::default();
        };

        if path.exists() {
            tracing::info!("[Settings] 尝试从 {path:?} 加载 JSON 配置文件。");
            match Self::read_from(&path) {
                Ok(settings) => return settings,
                Err(e) => {
                    tracing::error!("[Settings] 加载配置文件 {path:?} 失败: {e}。将使用默认配置。");
                    return Self::default();
                }
            }
        }

        tracing::info!("[Settings] 配置文件 {path:?} 未找到。将创建并使用默认配置。");
        let default_settings = Self::default();
        if let Err(e) = default_settings.save_to(&path) {
            tracing::error!("[Settings] 无法保存初始默认配置文件: {e}");
        }
        default_settings
    }

    fn read_from(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let json_string = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, json_string)?;
        tracing::info!("[Settings] 设置已成功保存到 {path:?}");
        Ok(())
    }

    /// 命令行参数优先于配置文件中的源文件路径。
    pub fn resolve_source(&self, override_path: Option<&Path>) -> AppResult<PathBuf> {
        override_path
            .map(Path::to_path_buf)
            .or_else(|| self.source_path.clone())
            .ok_or(AppError::SourceNotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let settings = AppSettings::load(Some(&path));
        assert_eq!(settings, AppSettings::default());
        assert!(path.exists());

        let written: AppSettings =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.export_file_name, DEFAULT_EXPORT_FILE_NAME);
    }

    #[test]
    fn test_legacy_shortcut_key_and_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"{ "shortcut": "/projects/demo.mlt", "synthesis": { "playlist_name": "Cards" } }"#,
        )
        .unwrap();

        let settings = AppSettings::load(Some(&path));
        assert_eq!(settings.source_path, Some(PathBuf::from("/projects/demo.mlt")));
        assert_eq!(settings.synthesis.playlist_name, "Cards");
        assert_eq!(settings.synthesis.fixed_clip_out, "00:00:00.483");
        assert_eq!(settings.export_file_name, DEFAULT_EXPORT_FILE_NAME);
    }

    #[test]
    fn test_malformed_file_is_kept_and_defaults_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let settings = AppSettings::load(Some(&path));
        assert_eq!(settings, AppSettings::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_resolve_source_prefers_override() {
        let settings = AppSettings {
            source_path: Some(PathBuf::from("a.mlt")),
            ..Default::default()
        };
        assert_eq!(
            settings.resolve_source(Some(Path::new("b.mlt"))).unwrap(),
            PathBuf::from("b.mlt")
        );
        assert_eq!(settings.resolve_source(None).unwrap(), PathBuf::from("a.mlt"));
        assert!(matches!(
            AppSettings::default().resolve_source(None),
            Err(AppError::SourceNotConfigured)
        ));
    }
}
