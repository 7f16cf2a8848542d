use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// 合成步骤。流水线总是按 `Producers` → `Playlist` → `Transitions` 的顺序执行。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Pass {
    /// 为绑定了图片的标记生成 producer。
    Producers,
    /// 生成由空白和条目组成的播放列表以及对应的轨道。
    Playlist,
    /// 为缺少混合的轨道对补齐 transition。
    Transitions,
}

/// 合成选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    /// 每个条目在画面上停留的固定时长。
    pub fixed_clip_out: String,
    /// 图片 producer 的 `length` 属性。
    pub producer_length: String,
    /// 图片 producer 的 `out` 属性。
    pub producer_out: String,
    /// 写入 `meta.media.width` 的宽度。
    pub media_width: u32,
    /// 写入 `meta.media.height` 的高度。
    pub media_height: u32,
    /// 新播放列表的 `shotcut:name`。
    pub playlist_name: String,
    /// 新 transition 使用的混合服务。
    pub blend_service: String,
    /// 分配 id 时的最小数字。
    pub minimum_id: u64,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            fixed_clip_out: "00:00:00.483".to_string(),
            producer_length: "04:00:00.000".to_string(),
            producer_out: "03:59:59.960".to_string(),
            media_width: 1920,
            media_height: 1080,
            playlist_name: "Markers".to_string(),
            blend_service: "qtblend".to_string(),
            minimum_id: 1,
        }
    }
}
