//! # Transition 合成
//!
//! 为主 tractor 中每一对轨道补齐缺失的混合 transition。
//! 这一步只依赖现有的轨道结构，不需要标记。

use mlt_core::{MltError, SynthesisOptions};
use tracing::{debug, info};

use super::{SynthesisOutcome, merge};
use crate::{
    IdAllocator,
    document::{
        Document, Element,
        constants::{ATTR_ID, PREFIX_TRANSITION, PROP_A_TRACK, PROP_B_TRACK, PROP_MLT_SERVICE, TAG_TRANSITION},
    },
};

/// 为缺少 transition 的轨道对 `(a, b)`（`a < b`）追加默认混合配置。
///
/// 每个新 transition 都使用当前最小的空闲编号，因此之前留下的空缺会先被填补。
///
/// # Errors
///
/// 文档没有主 tractor 时返回 [`MltError::Structure`]，输入文档保持不变。
pub fn synthesize_transitions(
    document: &Document,
    allocator: &impl IdAllocator,
    options: &SynthesisOptions,
) -> Result<SynthesisOutcome, MltError> {
    if document.main_tractor_index().is_none() {
        return Err(MltError::structure("找不到主 tractor，无法补齐 transition"));
    }

    let track_count = document.tracks().len();
    let mut output = document.clone();
    let mut created_ids = Vec::new();

    for a_track in 0..track_count {
        for b_track in (a_track + 1)..track_count {
            if output.has_transition(a_track, b_track) {
                debug!("轨道 ({a_track}, {b_track}) 已有 transition");
                continue;
            }

            let number = allocator.lowest_free_id(&output, PREFIX_TRANSITION);
            let id = allocator.format_id(PREFIX_TRANSITION, number);
            merge::append_transition(
                &mut output,
                build_blend_transition(&id, a_track, b_track, options),
            )?;

            info!("为轨道 ({a_track}, {b_track}) 添加了 {id}");
            created_ids.push(id);
        }
    }

    Ok(SynthesisOutcome {
        document: output,
        created_ids,
        warnings: Vec::new(),
    })
}

fn build_blend_transition(
    id: &str,
    a_track: usize,
    b_track: usize,
    options: &SynthesisOptions,
) -> Element {
    Element::new(TAG_TRANSITION)
        .with_attribute(ATTR_ID, id)
        .with_property(PROP_A_TRACK, a_track.to_string())
        .with_property(PROP_B_TRACK, b_track.to_string())
        .with_property("compositing", "0")
        .with_property("distort", "0")
        .with_property("rotate_center", "0")
        .with_property(PROP_MLT_SERVICE, options.blend_service.as_str())
        .with_property("threads", "0")
        .with_property("disable", "0")
}
