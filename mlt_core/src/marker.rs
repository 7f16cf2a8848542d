use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{MltError, parse_timecode};

/// 时间线上的一个标记。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// 标记在源文档中的序号，从 1 开始。只在提取时分配一次。
    pub number: usize,
    /// 标记名称，自动匹配素材时作为文件名的比对键。
    pub name: String,
    /// 开始时间，`HH:MM:SS.mmm` 原始文本。
    pub start_time: String,
    /// 结束时间，可选。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// 显示颜色，例如 `#008000`。
    pub color: String,
    /// 绑定的图片素材路径。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<PathBuf>,
    /// 绑定的视频素材路径。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<PathBuf>,
}

impl Marker {
    /// 创建一个未绑定素材的标记。
    pub fn new(
        number: usize,
        name: impl Into<String>,
        start_time: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            number,
            name: name.into(),
            start_time: start_time.into(),
            end_time: None,
            color: color.into(),
            picture: None,
            video: None,
        }
    }

    /// 开始时间（毫秒）。
    ///
    /// # Errors
    ///
    /// 开始时间不是合法的时间码时返回 [`MltError::InvalidTimecode`]。
    pub fn start_ms(&self) -> Result<u64, MltError> {
        parse_timecode(&self.start_time)
    }

    /// 结束时间（毫秒），没有结束时间时返回 `None`。
    ///
    /// # Errors
    ///
    /// 结束时间存在但不合法时返回 [`MltError::InvalidTimecode`]。
    pub fn end_ms(&self) -> Result<Option<u64>, MltError> {
        self.end_time.as_deref().map(parse_timecode).transpose()
    }

    /// 开始时间能否被解析。无法解析的标记在合成时会被跳过。
    #[must_use]
    pub fn has_valid_start(&self) -> bool {
        self.start_ms().is_ok()
    }
}

/// 按源文档顺序保存的标记集合。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerStore {
    markers: Vec<Marker>,
}

impl MarkerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用已有的标记列表创建集合，列表会按 `number` 排序。
    #[must_use]
    pub fn from_markers(mut markers: Vec<Marker>) -> Self {
        markers.sort_by_key(|m| m.number);
        Self { markers }
    }

    pub fn push(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Marker> {
        self.markers.iter_mut()
    }

    #[must_use]
    pub fn get(&self, number: usize) -> Option<&Marker> {
        self.markers.iter().find(|m| m.number == number)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Marker> {
        self.markers
    }

    /// 返回开始时间合法的标记，按开始时间升序排列。
    ///
    /// 使用稳定排序，开始时间相同的标记保持原有的 `number` 顺序。
    #[must_use]
    pub fn sorted_by_start(&self) -> Vec<(u64, &Marker)> {
        let mut timed: Vec<(u64, &Marker)> = self
            .markers
            .iter()
            .filter_map(|m| m.start_ms().ok().map(|ms| (ms, m)))
            .collect();
        timed.sort_by_key(|(ms, _)| *ms);
        timed
    }
}

impl FromIterator<Marker> for MarkerStore {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        Self::from_markers(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MarkerStore {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}
