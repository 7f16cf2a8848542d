//! # 元素 id 分配
//!
//! 生成的 id 采用 `<前缀><整数>` 的约定（例如 `producer3`）。
//! 计数器从不持久化，每次分配都重新扫描当前文档，
//! 因此两次合成之间的手工修改不会导致 id 冲突。

use std::collections::BTreeSet;

use crate::document::Document;

/// id 分配策略。
pub trait IdAllocator {
    /// 返回已用编号的最大值加一。用于 producer 和播放列表，编号只增不减。
    fn next_id(&self, document: &Document, prefix: &str) -> u64;

    /// 返回尚未使用的最小编号。用于 transition，优先填补之前留下的空缺。
    fn lowest_free_id(&self, document: &Document, prefix: &str) -> u64;

    /// 由前缀和编号拼出 id 文本。
    fn format_id(&self, prefix: &str, value: u64) -> String {
        format!("{prefix}{value}")
    }
}

/// 默认的分配器：匹配 `^<前缀>\d+$` 的 id。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixIdAllocator {
    /// 可分配的最小编号。
    pub minimum: u64,
}

impl Default for SuffixIdAllocator {
    fn default() -> Self {
        Self { minimum: 1 }
    }
}

impl SuffixIdAllocator {
    #[must_use]
    pub const fn new(minimum: u64) -> Self {
        Self { minimum }
    }

    /// 收集文档中给定前缀下已使用的全部编号。
    #[must_use]
    pub fn used_numbers(document: &Document, prefix: &str) -> BTreeSet<u64> {
        document
            .element_ids()
            .filter_map(|id| numeric_suffix(id, prefix))
            .collect()
    }
}

/// 取出 `id` 去掉 `prefix` 后的编号；剩余部分必须全部是 ASCII 数字。
fn numeric_suffix(id: &str, prefix: &str) -> Option<u64> {
    let digits = id.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // 超出 u64 的编号不参与分配
    digits.parse().ok()
}

impl IdAllocator for SuffixIdAllocator {
    fn next_id(&self, document: &Document, prefix: &str) -> u64 {
        Self::used_numbers(document, prefix)
            .last()
            .map_or(self.minimum, |max| max.saturating_add(1).max(self.minimum))
    }

    fn lowest_free_id(&self, document: &Document, prefix: &str) -> u64 {
        let used = Self::used_numbers(document, prefix);
        let mut candidate = self.minimum;
        for &n in used.range(self.minimum..) {
            if n != candidate {
                break;
            }
            candidate += 1;
        }
        candidate
    }
}

/// 使用默认分配器计算下一个编号。
#[must_use]
pub fn next_id(document: &Document, prefix: &str) -> u64 {
    SuffixIdAllocator::default().next_id(document, prefix)
}

/// 使用默认分配器计算最小空闲编号。
#[must_use]
pub fn lowest_free_id(document: &Document, prefix: &str) -> u64 {
    SuffixIdAllocator::default().lowest_free_id(document, prefix)
}
