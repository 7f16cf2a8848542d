//! # 时间线合成
//!
//! 三个合成步骤都是纯函数：接收文档的只读引用，返回修改后的新文档。
//! 步骤失败时原文档不会被修改。

mod merge;
mod playlist;
mod producer;
mod transition;

pub use playlist::synthesize_playlist;
pub use producer::synthesize_producers;
pub use transition::synthesize_transitions;

use mlt_core::{MarkerStore, MltError, Pass, SynthesisOptions, SynthesisWarning};
use tracing::{error, info};

use crate::{IdAllocator, document::Document};

/// 单个合成步骤的结果。
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    /// 合成后的文档。
    pub document: Document,
    /// 本步骤新建元素的 id，按插入顺序排列。
    pub created_ids: Vec<String>,
    pub warnings: Vec<SynthesisWarning>,
}

/// 流水线的执行结果。
#[derive(Debug)]
pub struct PipelineOutcome {
    /// 最后一个成功步骤之后的文档。
    pub document: Document,
    pub warnings: Vec<SynthesisWarning>,
    pub created_ids: Vec<String>,
    /// 成功完成的步骤。
    pub completed: Vec<Pass>,
    /// 第一个失败的步骤及其错误，之后的步骤不再执行。
    pub failure: Option<(Pass, MltError)>,
}

impl PipelineOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// 执行单个合成步骤。
///
/// # Errors
///
/// 返回对应步骤的错误。
pub fn run_pass(
    pass: Pass,
    document: &Document,
    markers: &MarkerStore,
    allocator: &impl IdAllocator,
    options: &SynthesisOptions,
) -> Result<SynthesisOutcome, MltError> {
    match pass {
        Pass::Producers => synthesize_producers(document, markers, allocator, options),
        Pass::Playlist => synthesize_playlist(document, markers, allocator, options),
        Pass::Transitions => synthesize_transitions(document, allocator, options),
    }
}

/// 按 producer → playlist → transition 的固定顺序执行请求的步骤。
///
/// `passes` 的顺序和重复项会被忽略。某一步失败时停止执行，
/// 返回的文档是失败前最后一次成功的结果。
#[must_use]
pub fn run_pipeline(
    document: &Document,
    markers: &MarkerStore,
    allocator: &impl IdAllocator,
    options: &SynthesisOptions,
    passes: &[Pass],
) -> PipelineOutcome {
    let mut ordered = passes.to_vec();
    ordered.sort_unstable();
    ordered.dedup();

    let mut outcome = PipelineOutcome {
        document: document.clone(),
        warnings: Vec::new(),
        created_ids: Vec::new(),
        completed: Vec::new(),
        failure: None,
    };

    for pass in ordered {
        match run_pass(pass, &outcome.document, markers, allocator, options) {
            Ok(step) => {
                info!(
                    "步骤 {pass} 完成，新增 {} 个元素，{} 条警告",
                    step.created_ids.len(),
                    step.warnings.len()
                );
                outcome.document = step.document;
                outcome.created_ids.extend(step.created_ids);
                outcome.warnings.extend(step.warnings);
                outcome.completed.push(pass);
            }
            Err(e) => {
                error!("步骤 {pass} 失败: {e}");
                outcome.failure = Some((pass, e));
                break;
            }
        }
    }

    outcome
}
