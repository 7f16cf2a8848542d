use std::fmt;

/// 合成过程中产生的非致命问题。
///
/// 这些问题不会中断当前操作，会随结果一起返回给调用方。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisWarning {
    /// 文档中没有标记区段。
    MarkersNotFound,
    /// 某条标记记录缺少必需字段，已跳过。
    MarkerExtraction {
        /// 记录在标记区段中的位置，从 1 开始。
        position: usize,
        /// 缺失的字段名。
        missing_field: &'static str,
    },
    /// 标记的开始时间无法解析，合成时会跳过该标记。
    InvalidMarkerTime { number: usize, value: String },
    /// 标记没有绑定图片素材，未生成 producer。
    MissingAsset { number: usize, name: String },
    /// 计算出的空白长度为负，已按零输出。
    NegativeDuration { number: usize, overrun_ms: u64 },
    /// 找不到图片路径与标记一致的 producer，播放列表中没有为它生成条目。
    UnresolvedProducer {
        number: usize,
        /// 标记绑定的图片路径，未绑定时为 `None`。
        picture: Option<String>,
    },
}

impl fmt::Display for SynthesisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarkersNotFound => write!(f, "文档中未找到标记区段"),
            Self::MarkerExtraction {
                position,
                missing_field,
            } => write!(f, "第 {position} 条标记缺少字段 '{missing_field}'，已跳过"),
            Self::InvalidMarkerTime { number, value } => {
                write!(f, "标记 #{number} 的开始时间 '{value}' 无效，合成时将跳过")
            }
            Self::MissingAsset { number, name } => {
                write!(f, "标记 #{number} ({name}) 未绑定图片，跳过 producer 生成")
            }
            Self::NegativeDuration { number, overrun_ms } => write!(
                f,
                "标记 #{number} 前的空白长度为负 (超出 {overrun_ms}ms)，已按 0 处理"
            ),
            Self::UnresolvedProducer {
                number,
                picture: Some(picture),
            } => write!(
                f,
                "标记 #{number} 找不到 resource 为 '{picture}' 的 producer，已跳过该条目"
            ),
            Self::UnresolvedProducer {
                number,
                picture: None,
            } => write!(f, "标记 #{number} 没有对应的 producer，已跳过该条目"),
        }
    }
}
