//! # MLT 文档模型
//!
//! 提供文档树以及合成步骤需要的类型化访问器，例如最后一个播放列表、
//! 主 tractor、轨道列表和已有的 transition。

pub mod constants;
mod element;

pub use element::{Descendants, Element, Node, property_element};

use mlt_core::MltError;

use self::constants::{
    ATTR_NAME, PROP_A_TRACK, PROP_B_TRACK, PROP_MARKERS, PROP_RESOURCE, TAG_PLAYLIST,
    TAG_PRODUCER, TAG_PROPERTIES, TAG_TRACK, TAG_TRACTOR, TAG_TRANSITION,
};

/// `<?xml ...?>` 声明。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for Declaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: Some("utf-8".to_string()),
            standalone: None,
        }
    }
}

/// 一个完整的 MLT 工程文档。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub declaration: Option<Declaration>,
    pub root: Element,
}

impl Document {
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self {
            declaration: Some(Declaration::default()),
            root,
        }
    }

    /// 从 XML 文本解析文档，见 [`crate::parse_document`]。
    ///
    /// # Errors
    ///
    /// 文本不是格式良好的 XML 时返回错误。
    pub fn parse(content: &str) -> Result<Self, MltError> {
        crate::parser::parse_document(content)
    }

    /// 序列化为文本，见 [`crate::serialize_document`]。
    ///
    /// # Errors
    ///
    /// 写入 XML 失败时返回错误。
    pub fn to_xml_string(&self) -> Result<String, MltError> {
        crate::serializer::serialize_document(self)
    }

    /// 文档中所有元素的 `id` 属性。
    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.root.descendants().filter_map(Element::id)
    }

    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.element_ids().any(|existing| existing == id)
    }

    /// 根元素下的所有播放列表。
    pub fn playlists(&self) -> impl Iterator<Item = &Element> {
        self.root.elements_named(TAG_PLAYLIST)
    }

    /// 最后一个播放列表在根元素 `children` 中的下标。
    #[must_use]
    pub fn last_playlist_index(&self) -> Option<usize> {
        self.root.last_child_index(TAG_PLAYLIST)
    }

    /// 主 tractor（轨道列表容器）在根元素 `children` 中的下标。
    ///
    /// 主 tractor 是根元素下的最后一个 `<tractor>`，
    /// 更早出现的 tractor 属于片段之间的转场。
    #[must_use]
    pub fn main_tractor_index(&self) -> Option<usize> {
        self.root.last_child_index(TAG_TRACTOR)
    }

    #[must_use]
    pub fn main_tractor(&self) -> Option<&Element> {
        self.main_tractor_index()
            .and_then(|i| self.root.children[i].as_element())
    }

    pub fn main_tractor_mut(&mut self) -> Option<&mut Element> {
        let index = self.main_tractor_index()?;
        self.root.children[index].as_element_mut()
    }

    /// 主 tractor 中的轨道，下标即轨道编号。
    #[must_use]
    pub fn tracks(&self) -> Vec<&Element> {
        self.main_tractor()
            .map(|t| t.elements_named(TAG_TRACK).collect())
            .unwrap_or_default()
    }

    /// 主 tractor 中直接包含的 transition。
    #[must_use]
    pub fn transitions(&self) -> Vec<&Element> {
        self.main_tractor()
            .map(|t| t.elements_named(TAG_TRANSITION).collect())
            .unwrap_or_default()
    }

    /// 主 tractor 中是否已有连接轨道 `a` 与 `b` 的 transition。
    #[must_use]
    pub fn has_transition(&self, a_track: usize, b_track: usize) -> bool {
        self.transitions().iter().any(|t| {
            track_property(t, PROP_A_TRACK) == Some(a_track)
                && track_property(t, PROP_B_TRACK) == Some(b_track)
        })
    }

    /// 第一个 `<properties name="shotcut:markers">` 元素。
    #[must_use]
    pub fn markers_section(&self) -> Option<&Element> {
        self.root
            .descendants()
            .find(|e| e.is(TAG_PROPERTIES) && e.attribute(ATTR_NAME) == Some(PROP_MARKERS))
    }

    /// 根元素下 `resource` 属性等于给定路径的 producer。
    #[must_use]
    pub fn find_producer_by_resource(&self, resource: &str) -> Option<&Element> {
        self.root
            .elements_named(TAG_PRODUCER)
            .find(|p| p.property(PROP_RESOURCE).as_deref() == Some(resource))
    }
}

fn track_property(transition: &Element, name: &str) -> Option<usize> {
    transition
        .property(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
}
