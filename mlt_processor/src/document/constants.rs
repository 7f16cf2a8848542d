//! # MLT 文档 - 常量定义
//!
//! 该模块包含了读取和生成 MLT 工程文件时用到的标签名、属性名和属性值。

pub const TAG_PRODUCER: &str = "producer";
pub const TAG_PLAYLIST: &str = "playlist";
pub const TAG_TRACTOR: &str = "tractor";
pub const TAG_TRACK: &str = "track";
pub const TAG_TRANSITION: &str = "transition";
pub const TAG_BLANK: &str = "blank";
pub const TAG_ENTRY: &str = "entry";
pub const TAG_PROPERTY: &str = "property";
pub const TAG_PROPERTIES: &str = "properties";

pub const ATTR_ID: &str = "id";
pub const ATTR_NAME: &str = "name";
pub const ATTR_IN: &str = "in";
pub const ATTR_OUT: &str = "out";
pub const ATTR_LENGTH: &str = "length";
pub const ATTR_PRODUCER: &str = "producer";

pub const PROP_MARKERS: &str = "shotcut:markers";
pub const PROP_MARKER_TEXT: &str = "text";
pub const PROP_MARKER_START: &str = "start";
pub const PROP_MARKER_END: &str = "end";
pub const PROP_MARKER_COLOR: &str = "color";

pub const PROP_RESOURCE: &str = "resource";
pub const PROP_A_TRACK: &str = "a_track";
pub const PROP_B_TRACK: &str = "b_track";
pub const PROP_MLT_SERVICE: &str = "mlt_service";

pub const PREFIX_PRODUCER: &str = "producer";
pub const PREFIX_PLAYLIST: &str = "playlist";
pub const PREFIX_TRANSITION: &str = "transition";
