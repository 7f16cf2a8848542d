//! 合成前后文本的差异预览。

use std::fmt::Write as _;

use mlt_processor::{DiffKind, DiffSummary, diff_lines};

/// 未变化的区段只保留前后各 `context` 行。
pub fn render_preview(original: &str, modified: &str, context: usize) -> String {
    let original_lines: Vec<&str> = original.lines().collect();
    let modified_lines: Vec<&str> = modified.lines().collect();
    let ops = diff_lines(original, modified);
    let summary = DiffSummary::from_ops(&ops);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "新增 {} 行，删除 {} 行，修改 {} 行",
        summary.added, summary.removed, summary.changed
    );
    if !summary.has_changes() {
        return out;
    }

    let last = ops.len().saturating_sub(1);
    for (index, op) in ops.iter().enumerate() {
        match op.kind {
            DiffKind::Unchanged => {
                let lines = &modified_lines[op.modified.clone()];
                let head = if index == 0 { 0 } else { context.min(lines.len()) };
                let tail = if index == last {
                    0
                } else {
                    context.min(lines.len() - head)
                };
                let hidden = lines.len() - head - tail;

                push_lines(&mut out, ' ', &lines[..head]);
                if hidden > 0 {
                    let _ = writeln!(out, "@@ 省略 {hidden} 行 @@");
                }
                push_lines(&mut out, ' ', &lines[lines.len() - tail..]);
            }
            DiffKind::Removed => push_lines(&mut out, '-', &original_lines[op.original.clone()]),
            DiffKind::Added => push_lines(&mut out, '+', &modified_lines[op.modified.clone()]),
            DiffKind::Changed => {
                push_lines(&mut out, '-', &original_lines[op.original.clone()]);
                push_lines(&mut out, '+', &modified_lines[op.modified.clone()]);
            }
        }
    }
    out
}

fn push_lines(out: &mut String, marker: char, lines: &[&str]) {
    for line in lines {
        let _ = writeln!(out, "{marker} {line}");
    }
}
