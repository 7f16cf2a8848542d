//! # 逐行差异
//!
//! 对去除首尾空白后的行求最长公共子序列（线性内存的分治算法），得到新增、删除、修改和未变化的区段，
//! 供预览界面高亮显示。引擎本身无状态。

use std::ops::Range;

use strum_macros::{Display, EnumString};

/// 区段类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DiffKind {
    Added,
    Removed,
    Changed,
    Unchanged,
}

/// 区段所在的一侧。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Original,
    Modified,
}

/// 一段差异。两个范围都是从 0 开始的行号区间。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOp {
    pub kind: DiffKind,
    pub original: Range<usize>,
    pub modified: Range<usize>,
}

/// 某一侧需要高亮的行区间。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub side: Side,
    pub lines: Range<usize>,
    pub kind: DiffKind,
}

/// 各类型涉及的行数统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// 新增的行数（修改后一侧）。
    pub added: usize,
    /// 删除的行数（原始一侧）。
    pub removed: usize,
    /// 被修改的行数，取两侧中较大的一侧。
    pub changed: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    #[must_use]
    pub fn from_ops(ops: &[DiffOp]) -> Self {
        ops.iter().fold(Self::default(), |mut summary, op| {
            match op.kind {
                DiffKind::Added => summary.added += op.modified.len(),
                DiffKind::Removed => summary.removed += op.original.len(),
                DiffKind::Changed => {
                    summary.changed += op.original.len().max(op.modified.len());
                }
                DiffKind::Unchanged => summary.unchanged += op.original.len(),
            }
            summary
        })
    }

    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.added + self.removed + self.changed > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Equal,
    Delete,
    Insert,
}

/// 计算两段文本之间的逐行差异。
///
/// 比较前每行都会去除首尾空白，因此仅缩进不同的行视为相同。
/// 返回的区段按顺序覆盖两侧的全部行。
#[must_use]
pub fn diff_lines(original: &str, modified: &str) -> Vec<DiffOp> {
    let a: Vec<&str> = original.lines().map(str::trim).collect();
    let b: Vec<&str> = modified.lines().map(str::trim).collect();

    // 先剥离公共前后缀，只对中间部分求 LCS
    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let a_mid = &a[prefix..a.len() - suffix];
    let b_mid = &b[prefix..b.len() - suffix];

    let mut ops = Vec::new();
    push_op(&mut ops, DiffKind::Unchanged, 0..prefix, 0..prefix);

    let steps = lcs_steps(a_mid, b_mid);
    let (mut i, mut j) = (prefix, prefix);
    let mut idx = 0;
    while idx < steps.len() {
        let (start_i, start_j) = (i, j);
        if steps[idx] == Step::Equal {
            while idx < steps.len() && steps[idx] == Step::Equal {
                i += 1;
                j += 1;
                idx += 1;
            }
            push_op(&mut ops, DiffKind::Unchanged, start_i..i, start_j..j);
            continue;
        }

        while idx < steps.len() && steps[idx] != Step::Equal {
            match steps[idx] {
                Step::Delete => i += 1,
                Step::Insert => j += 1,
                Step::Equal => {}
            }
            idx += 1;
        }
        let kind = match (i > start_i, j > start_j) {
            (true, true) => DiffKind::Changed,
            (true, false) => DiffKind::Removed,
            _ => DiffKind::Added,
        };
        push_op(&mut ops, kind, start_i..i, start_j..j);
    }

    push_op(
        &mut ops,
        DiffKind::Unchanged,
        a.len() - suffix..a.len(),
        b.len() - suffix..b.len(),
    );
    ops
}

/// 把差异区段展开为两侧各自需要高亮的区间，未变化的区段不输出。
#[must_use]
pub fn highlights(ops: &[DiffOp]) -> Vec<Highlight> {
    let mut result = Vec::new();
    for op in ops {
        match op.kind {
            DiffKind::Unchanged => {}
            DiffKind::Removed => result.push(Highlight {
                side: Side::Original,
                lines: op.original.clone(),
                kind: op.kind,
            }),
            DiffKind::Added => result.push(Highlight {
                side: Side::Modified,
                lines: op.modified.clone(),
                kind: op.kind,
            }),
            DiffKind::Changed => {
                result.push(Highlight {
                    side: Side::Original,
                    lines: op.original.clone(),
                    kind: op.kind,
                });
                result.push(Highlight {
                    side: Side::Modified,
                    lines: op.modified.clone(),
                    kind: op.kind,
                });
            }
        }
    }
    result
}

/// 追加区段，跳过空区段并合并相邻的未变化区段。
fn push_op(ops: &mut Vec<DiffOp>, kind: DiffKind, original: Range<usize>, modified: Range<usize>) {
    if original.is_empty() && modified.is_empty() {
        return;
    }
    if let Some(last) = ops.last_mut() {
        if kind == DiffKind::Unchanged
            && last.kind == DiffKind::Unchanged
            && last.original.end == original.start
            && last.modified.end == modified.start
        {
            last.original.end = original.end;
            last.modified.end = modified.end;
            return;
        }
    }
    ops.push(DiffOp {
        kind,
        original,
        modified,
    });
}

/// 求两侧之间的编辑步骤。
///
/// 使用 Hirschberg 分治法，只保留单行 LCS 长度，内存占用与行数成线性关系，
/// 大段改动也不会分配 `n × m` 的表。
fn lcs_steps(a: &[&str], b: &[&str]) -> Vec<Step> {
    let mut steps = Vec::with_capacity(a.len() + b.len());
    split_steps(a, b, &mut steps);
    steps
}

fn split_steps(a: &[&str], b: &[&str], steps: &mut Vec<Step>) {
    if a.is_empty() {
        steps.extend(std::iter::repeat_n(Step::Insert, b.len()));
        return;
    }
    if b.is_empty() {
        steps.extend(std::iter::repeat_n(Step::Delete, a.len()));
        return;
    }
    if let [line] = a {
        if let Some(pos) = b.iter().position(|other| other == line) {
            steps.extend(std::iter::repeat_n(Step::Insert, pos));
            steps.push(Step::Equal);
            steps.extend(std::iter::repeat_n(Step::Insert, b.len() - pos - 1));
        } else {
            steps.push(Step::Delete);
            steps.extend(std::iter::repeat_n(Step::Insert, b.len()));
        }
        return;
    }

    let mid = a.len() / 2;
    let upper = lcs_row(a[..mid].iter().copied(), b.iter().copied());
    let lower = lcs_row(a[mid..].iter().rev().copied(), b.iter().rev().copied());

    // upper[j] + lower[m - j] 最大的位置就是最优路径穿过中间行的位置，取最靠前的一个
    let m = b.len();
    let split = (0..=m)
        .rev()
        .max_by_key(|&j| upper[j] + lower[m - j])
        .unwrap_or(0);

    split_steps(&a[..mid], &b[..split], steps);
    split_steps(&a[mid..], &b[split..], steps);
}

/// 返回 `row[j]` = `a` 与 `b` 前 `j` 项的 LCS 长度，只保留一行。
fn lcs_row<'a, A, B>(a: A, b: B) -> Vec<usize>
where
    A: Iterator<Item = &'a str>,
    B: Iterator<Item = &'a str> + Clone,
{
    let mut row = vec![0usize; b.clone().count() + 1];
    for x in a {
        let mut diagonal = 0;
        for (j, y) in b.clone().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row
}
