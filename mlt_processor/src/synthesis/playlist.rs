//! # 播放列表合成
//!
//! 把标记按开始时间排列成一条由空白 (`<blank>`) 和条目 (`<entry>`) 组成的新轨道。
//! 每个条目固定显示 `fixed_clip_out` 时长，空白长度为两个标记之间的间隔减去这段时长。

use mlt_core::{
    Marker, MarkerStore, MltError, SynthesisOptions, SynthesisWarning, ZERO_TIMECODE,
    adjusted_duration, format_timecode, parse_timecode,
};
use tracing::{debug, info, warn};

use super::{SynthesisOutcome, merge};
use crate::{
    IdAllocator,
    document::{
        Document, Element,
        constants::{
            ATTR_ID, ATTR_IN, ATTR_LENGTH, ATTR_OUT, ATTR_PRODUCER, PREFIX_PLAYLIST, TAG_BLANK,
            TAG_ENTRY, TAG_PLAYLIST, TAG_TRACK,
        },
    },
};

/// 生成播放列表及其对应的轨道。
///
/// 开始时间无法解析的标记会被跳过；开始时间相同的标记保持 `number` 顺序。
/// 找不到对应 producer 的标记同样不生成条目，后续条目的位置不受影响。
/// 计算出的空白长度为负时按零处理并给出 [`SynthesisWarning::NegativeDuration`]。
///
/// # Errors
///
/// * `MltError::InvalidTimecode` - `fixed_clip_out` 不是合法时间码
/// * `MltError::Structure` - 文档没有主 tractor
///
/// 出错时输入文档保持不变。
pub fn synthesize_playlist(
    document: &Document,
    markers: &MarkerStore,
    allocator: &impl IdAllocator,
    options: &SynthesisOptions,
) -> Result<SynthesisOutcome, MltError> {
    let fixed_out = parse_timecode(&options.fixed_clip_out)?;
    if document.main_tractor_index().is_none() {
        return Err(MltError::structure("找不到主 tractor，无法添加播放列表轨道"));
    }

    let mut warnings: Vec<SynthesisWarning> = markers
        .iter()
        .filter(|m| !m.has_valid_start())
        .map(|m| SynthesisWarning::InvalidMarkerTime {
            number: m.number,
            value: m.start_time.clone(),
        })
        .collect();

    let playlist_number = allocator.next_id(document, PREFIX_PLAYLIST);
    let playlist_id = allocator.format_id(PREFIX_PLAYLIST, playlist_number);

    let mut playlist = Element::new(TAG_PLAYLIST)
        .with_attribute(ATTR_ID, playlist_id.as_str())
        .with_property("shotcut:video", "1")
        .with_property("shotcut:name", options.playlist_name.as_str());

    let clip_out = format_timecode(fixed_out);
    let mut cursor = 0u64;

    for (start, marker) in markers.sorted_by_start() {
        // 没有自己的 producer 的标记不占位，游标停在上一个条目的开始时间
        let Some(producer_id) = resolve_producer(document, marker, &mut warnings) else {
            continue;
        };

        let blank = adjusted_duration(cursor, start, fixed_out);
        let blank_ms = u64::try_from(blank).unwrap_or_else(|_| {
            warn!(
                "标记 #{} 前的空白长度为 {blank}ms，按 0 处理",
                marker.number
            );
            warnings.push(SynthesisWarning::NegativeDuration {
                number: marker.number,
                overrun_ms: blank.unsigned_abs(),
            });
            0
        });

        if blank_ms > 0 {
            playlist = playlist.with_child(
                Element::new(TAG_BLANK).with_attribute(ATTR_LENGTH, format_timecode(blank_ms)),
            );
        }

        debug!(
            "标记 #{} @ {} -> 空白 {blank_ms}ms, 条目 {producer_id}",
            marker.number, marker.start_time
        );
        playlist = playlist.with_child(
            Element::new(TAG_ENTRY)
                .with_attribute(ATTR_PRODUCER, producer_id)
                .with_attribute(ATTR_IN, ZERO_TIMECODE)
                .with_attribute(ATTR_OUT, clip_out.as_str()),
        );

        cursor = start;
    }

    let mut output = document.clone();
    merge::insert_playlist(&mut output, playlist)?;
    merge::insert_track(
        &mut output,
        Element::new(TAG_TRACK).with_attribute(ATTR_PRODUCER, playlist_id.as_str()),
    )?;

    info!("生成了播放列表 {playlist_id} 及对应轨道");

    Ok(SynthesisOutcome {
        document: output,
        created_ids: vec![playlist_id],
        warnings,
    })
}

/// 找到标记对应的 producer。
///
/// 只认 `resource` 等于标记图片路径的 producer，绝不借用其他标记的 id。
/// 找不到时记录 [`SynthesisWarning::UnresolvedProducer`] 并返回 `None`。
fn resolve_producer(
    document: &Document,
    marker: &Marker,
    warnings: &mut Vec<SynthesisWarning>,
) -> Option<String> {
    let picture = marker
        .picture
        .as_deref()
        .map(|p| p.to_string_lossy().into_owned());

    let found = picture
        .as_deref()
        .and_then(|resource| document.find_producer_by_resource(resource))
        .and_then(Element::id)
        .map(str::to_string);

    if found.is_none() {
        warn!("标记 #{} 没有对应的 producer，跳过该条目", marker.number);
        warnings.push(SynthesisWarning::UnresolvedProducer {
            number: marker.number,
            picture,
        });
    }
    found
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use mlt_core::Pass;

    use super::*;
    use crate::{SuffixIdAllocator, run_pipeline};

    const BASE: &str = r#"<mlt><playlist id="main_bin"/><playlist id="playlist0"/><tractor id="tractor0"><property name="shotcut">1</property><track producer="playlist0"/></tractor></mlt>"#;

    /// 在 `BASE` 中为每个名字插入一个 `resource` 为 `/m/<name>.png` 的 producer。
    fn base_with_producers(names: &[&str]) -> Document {
        let producers: String = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                format!(
                    r#"<producer id="producer{}"><property name="resource">/m/{name}.png</property></producer>"#,
                    i + 1
                )
            })
            .collect();
        let anchor = r#"<playlist id="playlist0"/>"#;
        Document::parse(&BASE.replacen(anchor, &format!("{producers}{anchor}"), 1)).unwrap()
    }

    fn bound(number: usize, name: &str, start: &str) -> Marker {
        Marker {
            picture: Some(PathBuf::from(format!("/m/{name}.png"))),
            ..Marker::new(number, name, start, "#fff")
        }
    }

    fn run(doc: &Document, markers: Vec<Marker>) -> SynthesisOutcome {
        synthesize_playlist(
            doc,
            &MarkerStore::from_markers(markers),
            &SuffixIdAllocator::default(),
            &SynthesisOptions::default(),
        )
        .unwrap()
    }

    fn children(playlist: &Element) -> Vec<(String, String)> {
        playlist
            .elements()
            .filter(|e| !e.is("property"))
            .map(|e| match e.name.as_str() {
                "blank" => ("blank".to_string(), e.attribute("length").unwrap().to_string()),
                _ => ("entry".to_string(), e.attribute("producer").unwrap().to_string()),
            })
            .collect()
    }

    fn new_playlist<'a>(document: &'a Document, id: &str) -> &'a Element {
        document.playlists().find(|p| p.id() == Some(id)).unwrap()
    }

    #[test]
    fn test_blank_lengths_reserve_fixed_clip() {
        let doc = base_with_producers(&["a", "b"]);
        let outcome = run(
            &doc,
            vec![
                bound(1, "a", "00:00:05.000"),
                bound(2, "b", "00:00:10.000"),
            ],
        );

        let playlist = new_playlist(&outcome.document, "playlist1");
        assert_eq!(
            children(playlist),
            vec![
                ("blank".to_string(), "00:00:04.517".to_string()),
                ("entry".to_string(), "producer1".to_string()),
                ("blank".to_string(), "00:00:04.517".to_string()),
                ("entry".to_string(), "producer2".to_string()),
            ]
        );
        assert!(outcome.warnings.is_empty());

        let entry = playlist.elements_named("entry").next().unwrap();
        assert_eq!(entry.attribute("in"), Some("00:00:00.000"));
        assert_eq!(entry.attribute("out"), Some("00:00:00.483"));
    }

    #[test]
    fn test_playlist_and_track_placement() {
        let doc = Document::parse(BASE).unwrap();
        let outcome = run(&doc, vec![Marker::new(1, "a", "00:00:05.000", "#fff")]);

        assert_eq!(outcome.created_ids, vec!["playlist1"]);
        let root_ids: Vec<&str> = outcome
            .document
            .root
            .elements()
            .filter_map(Element::id)
            .collect();
        assert_eq!(root_ids, vec!["main_bin", "playlist0", "playlist1", "tractor0"]);

        let tracks: Vec<&str> = outcome
            .document
            .tracks()
            .iter()
            .filter_map(|t| t.attribute("producer"))
            .collect();
        assert_eq!(tracks, vec!["playlist0", "playlist1"]);
    }

    #[test]
    fn test_zero_existing_playlists() {
        let doc = Document::parse(r#"<mlt><tractor id="tractor0"/></mlt>"#).unwrap();
        let outcome = run(&doc, vec![Marker::new(1, "a", "00:00:01.000", "#fff")]);

        assert_eq!(outcome.created_ids, vec!["playlist1"]);
        assert_eq!(outcome.document.playlists().count(), 1);
        let tracks = outcome.document.tracks();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].attribute("producer"), Some("playlist1"));
    }

    #[test]
    fn test_equal_start_times_keep_number_order() {
        let doc = base_with_producers(&["late", "tie-a", "tie-b"]);
        let outcome = run(
            &doc,
            vec![
                bound(1, "late", "00:00:09.000"),
                bound(2, "tie-a", "00:00:03.000"),
                bound(3, "tie-b", "00:00:03.000"),
            ],
        );

        let entries: Vec<String> = children(new_playlist(&outcome.document, "playlist1"))
            .into_iter()
            .filter(|(kind, _)| kind == "entry")
            .map(|(_, producer)| producer)
            .collect();
        assert_eq!(entries, vec!["producer2", "producer3", "producer1"]);
    }

    #[test]
    fn test_negative_and_zero_blanks_are_omitted() {
        let doc = base_with_producers(&["a", "b", "bad"]);
        let outcome = run(
            &doc,
            vec![
                bound(1, "a", "00:00:00.483"),
                bound(2, "b", "00:00:00.600"),
                bound(3, "bad", "soon"),
            ],
        );

        assert_eq!(
            children(new_playlist(&outcome.document, "playlist1")),
            vec![
                ("entry".to_string(), "producer1".to_string()),
                ("entry".to_string(), "producer2".to_string()),
            ]
        );
        assert!(outcome.warnings.contains(&SynthesisWarning::NegativeDuration {
            number: 2,
            overrun_ms: 366
        }));
        assert!(outcome.warnings.contains(&SynthesisWarning::InvalidMarkerTime {
            number: 3,
            value: "soon".to_string()
        }));
    }

    #[test]
    fn test_entries_follow_picture_resource() {
        let doc = Document::parse(
            r#"<mlt><producer id="producer7"><property name="resource">/media/b.png</property></producer><playlist id="playlist0"/><tractor id="tractor0"/></mlt>"#,
        )
        .unwrap();
        let marker = Marker {
            picture: Some(PathBuf::from("/media/b.png")),
            ..Marker::new(1, "b", "00:00:02.000", "#fff")
        };
        let outcome = run(&doc, vec![marker]);

        assert_eq!(
            children(new_playlist(&outcome.document, "playlist1"))
                .last()
                .unwrap()
                .1,
            "producer7"
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_unmatched_markers_never_borrow_other_ids() {
        // producer2 属于用户自己的素材，不能被序号为 2 的标记借用
        let doc = Document::parse(
            r#"<mlt><producer id="producer2"><property name="resource">clip.mp4</property></producer><playlist id="playlist0"/><tractor id="tractor0"/></mlt>"#,
        )
        .unwrap();
        let outcome = run(
            &doc,
            vec![
                Marker::new(1, "a", "00:00:01.000", "#fff"),
                bound(2, "b", "00:00:03.000"),
            ],
        );

        assert!(children(new_playlist(&outcome.document, "playlist1")).is_empty());
        assert_eq!(
            outcome.warnings,
            vec![
                SynthesisWarning::UnresolvedProducer {
                    number: 1,
                    picture: None
                },
                SynthesisWarning::UnresolvedProducer {
                    number: 2,
                    picture: Some("/m/b.png".to_string())
                },
            ]
        );
    }

    #[test]
    fn test_unbound_marker_between_bound_ones_is_skipped() {
        let doc = Document::parse(BASE).unwrap();
        let markers = MarkerStore::from_markers(vec![
            bound(1, "a", "00:00:01.000"),
            Marker::new(2, "b", "00:00:03.000", "#fff"),
            bound(3, "c", "00:00:06.000"),
        ]);

        let outcome = run_pipeline(
            &doc,
            &markers,
            &SuffixIdAllocator::default(),
            &SynthesisOptions::default(),
            &[Pass::Producers, Pass::Playlist],
        );
        assert!(outcome.is_success(), "{:?}", outcome.failure);

        let playlist = new_playlist(&outcome.document, "playlist1");
        assert_eq!(
            children(playlist),
            vec![
                ("blank".to_string(), "00:00:00.517".to_string()),
                ("entry".to_string(), "producer1".to_string()),
                ("blank".to_string(), "00:00:04.517".to_string()),
                ("entry".to_string(), "producer2".to_string()),
            ]
        );

        let resources: Vec<Option<String>> = playlist
            .elements_named("entry")
            .map(|entry| {
                let id = entry.attribute("producer").unwrap();
                outcome
                    .document
                    .root
                    .elements_named("producer")
                    .find(|p| p.id() == Some(id))
                    .and_then(|p| p.property("resource"))
            })
            .collect();
        assert_eq!(
            resources,
            vec![Some("/m/a.png".to_string()), Some("/m/c.png".to_string())]
        );

        assert!(outcome.warnings.contains(&SynthesisWarning::MissingAsset {
            number: 2,
            name: "b".to_string()
        }));
        assert!(outcome.warnings.contains(&SynthesisWarning::UnresolvedProducer {
            number: 2,
            picture: None
        }));
    }

    #[test]
    fn test_missing_tractor_leaves_document_untouched() {
        let doc = Document::parse(r#"<mlt><playlist id="playlist0"/></mlt>"#).unwrap();
        let result = synthesize_playlist(
            &doc,
            &MarkerStore::new(),
            &SuffixIdAllocator::default(),
            &SynthesisOptions::default(),
        );
        assert!(matches!(result, Err(MltError::Structure(_))));
    }
}
