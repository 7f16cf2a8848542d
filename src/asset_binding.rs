//! 按文件名把素材绑定到标记上。
//!
//! 文件名（不含扩展名）与标记名称忽略大小写相等即视为匹配。

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use mlt_core::MarkerStore;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Picture,
    Video,
}

impl AssetKind {
    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "png" | "jpg" | "jpeg" => Some(Self::Picture),
            "mp4" | "avi" => Some(Self::Video),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingReport {
    pub pictures: usize,
    pub videos: usize,
    /// 没有找到任何素材的标记序号。
    pub unmatched: Vec<usize>,
}

/// 扫描目录并为标记填充 `picture` / `video`。已有的绑定会被匹配到的文件覆盖。
pub fn bind_assets(markers: &mut MarkerStore, folder: &Path) -> AppResult<BindingReport> {
    let mut entries: Vec<PathBuf> = fs::read_dir(folder)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let mut assets: HashMap<(String, AssetKind), PathBuf> = HashMap::new();
    for path in entries {
        let Some(kind) = AssetKind::from_path(&path) else {
            continue;
        };
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        // 同名文件取排序后的第一个
        assets.entry((stem.to_lowercase(), kind)).or_insert(path);
    }

    let mut report = BindingReport::default();
    for marker in markers.iter_mut() {
        let key = marker.name.trim().to_lowercase();
        let picture = assets.get(&(key.clone(), AssetKind::Picture));
        let video = assets.get(&(key, AssetKind::Video));

        if let Some(path) = picture {
            tracing::debug!("标记 #{} 绑定图片 {path:?}", marker.number);
            marker.picture = Some(path.clone());
            report.pictures += 1;
        }
        if let Some(path) = video {
            tracing::debug!("标记 #{} 绑定视频 {path:?}", marker.number);
            marker.video = Some(path.clone());
            report.videos += 1;
        }
        if picture.is_none() && video.is_none() {
            report.unmatched.push(marker.number);
        }
    }

    tracing::info!(
        "素材绑定完成：图片 {}，视频 {}，未匹配 {}",
        report.pictures,
        report.videos,
        report.unmatched.len()
    );
    Ok(report)
}
