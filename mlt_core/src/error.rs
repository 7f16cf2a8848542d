use std::io;

use quick_xml::{
    Error as QuickXmlErrorMain, encoding::EncodingError,
    events::attributes::AttrError as QuickXmlAttrError,
};
use thiserror::Error;

/// 定义工程文件解析、合成与序列化过程中可能发生的各种错误。
#[derive(Error, Debug)]
pub enum MltError {
    /// XML 读写错误，通常来自 `quick-xml` 库。
    #[error("XML 错误: {0}")]
    Xml(#[from] QuickXmlErrorMain),
    /// XML 属性解析错误，通常来自 `quick-xml` 库。
    #[error("XML 属性错误: {0}")]
    Attribute(#[from] QuickXmlAttrError),
    /// XML 文本编码或解码错误。
    #[error("文本编码或解码错误: {0}")]
    Encoding(#[from] EncodingError),
    /// 文档结构不是格式良好的 XML（例如缺少根元素或标签未闭合）。
    #[error("文档格式错误: {0}")]
    Parse(String),
    /// 无效的时间码字符串。
    #[error("无效的时间码: {0}")]
    InvalidTimecode(String),
    /// 合成所需的结构元素缺失，例如找不到主 tractor。
    #[error("文档结构错误: {0}")]
    Structure(String),
    /// 内部逻辑错误或未明确分类的错误。
    #[error("错误: {0}")]
    Internal(String),
    /// 文件读写等IO错误。
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),
    /// 从字节序列转换为 UTF-8 字符串失败。
    #[error("UTF-8 转换错误: {0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),
    /// JSON 解析错误。
    #[error("解析 JSON 内容 {context} 失败: {source}")]
    JsonParse {
        /// 底层 `serde_json` 错误
        #[source]
        source: serde_json::Error,
        /// 有关错误发生位置的上下文信息。
        context: String,
    },
}

impl From<MltError> for std::io::Error {
    fn from(err: MltError) -> Self {
        std::io::Error::other(err)
    }
}

impl MltError {
    /// 创建一个带有上下文的 `JsonParse` 错误。
    #[must_use]
    pub fn json_parse(source: serde_json::Error, context: String) -> Self {
        Self::JsonParse { source, context }
    }

    /// 创建一个 `Structure` 错误。
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }
}

pub type MltResult<T> = std::result::Result<T, MltError>;
