//! # Producer 合成
//!
//! 为每个绑定了图片的标记生成一个静态图片 producer。

use std::path::Path;

use chrono::{DateTime, Local};
use md5::{Digest, Md5};
use mlt_core::{
    Marker, MarkerStore, MltError, SynthesisOptions, SynthesisWarning, ZERO_TIMECODE,
    parse_timecode,
};
use tracing::{info, warn};

use super::{SynthesisOutcome, merge};
use crate::{
    IdAllocator,
    document::{
        Document, Element,
        constants::{ATTR_ID, ATTR_IN, ATTR_OUT, PREFIX_PRODUCER, PROP_MLT_SERVICE, PROP_RESOURCE, TAG_PRODUCER},
    },
};

const IMAGE_SERVICE: &str = "qimage";

/// 生成图片 producer 并插入到最后一个播放列表之前。
///
/// 没有绑定图片的标记会被跳过，并给出 [`SynthesisWarning::MissingAsset`]。
/// 每个 producer 的编号都针对已插入前面 producer 的文档重新计算。
///
/// # Errors
///
/// 选项中的 `producer_length` 或 `producer_out` 不是合法时间码时返回
/// [`MltError::InvalidTimecode`]，此时不产生任何修改。
pub fn synthesize_producers(
    document: &Document,
    markers: &MarkerStore,
    allocator: &impl IdAllocator,
    options: &SynthesisOptions,
) -> Result<SynthesisOutcome, MltError> {
    parse_timecode(&options.producer_length)?;
    parse_timecode(&options.producer_out)?;

    let mut output = document.clone();
    let mut created_ids = Vec::new();
    let mut warnings = Vec::new();
    let now = Local::now();

    for marker in markers {
        let Some(picture) = marker.picture.as_deref() else {
            warn!("标记 #{} ({}) 未绑定图片，跳过", marker.number, marker.name);
            warnings.push(SynthesisWarning::MissingAsset {
                number: marker.number,
                name: marker.name.clone(),
            });
            continue;
        };

        let number = allocator.next_id(&output, PREFIX_PRODUCER);
        let id = allocator.format_id(PREFIX_PRODUCER, number);
        let producer = build_image_producer(&id, marker, picture, options, &now);
        merge::insert_producer(&mut output, producer);

        info!("为标记 #{} 生成了 {id} ({})", marker.number, picture.display());
        created_ids.push(id);
    }

    Ok(SynthesisOutcome {
        document: output,
        created_ids,
        warnings,
    })
}

fn build_image_producer(
    id: &str,
    marker: &Marker,
    picture: &Path,
    options: &SynthesisOptions,
    now: &DateTime<Local>,
) -> Element {
    let caption = picture
        .file_name()
        .map_or_else(|| picture.to_string_lossy(), |name| name.to_string_lossy())
        .into_owned();

    Element::new(TAG_PRODUCER)
        .with_attribute(ATTR_ID, id)
        .with_attribute(ATTR_IN, ZERO_TIMECODE)
        .with_attribute(ATTR_OUT, options.producer_out.as_str())
        .with_property("length", options.producer_length.as_str())
        .with_property("eof", "pause")
        .with_property(PROP_RESOURCE, picture.to_string_lossy())
        .with_property("ttl", "1")
        .with_property("aspect_ratio", "1")
        .with_property("meta.media.progressive", "1")
        .with_property("seekable", "1")
        .with_property("meta.media.width", options.media_width.to_string())
        .with_property("meta.media.height", options.media_height.to_string())
        .with_property(PROP_MLT_SERVICE, IMAGE_SERVICE)
        .with_property("creation_time", now.format("%Y-%m-%dT%H:%M:%S").to_string())
        .with_property("shotcut:hash", uniqueness_token(&marker.name, now))
        .with_property("shotcut:caption", caption)
}

/// 由标记名和当前时间计算的指纹，仅用于避免重复，不具备安全性。
fn uniqueness_token(name: &str, now: &DateTime<Local>) -> String {
    let seed = format!("{name}{}", now.timestamp_nanos_opt().unwrap_or_default());
    hex::encode(Md5::digest(seed.as_bytes()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::SuffixIdAllocator;

    fn marker(number: usize, picture: Option<&str>) -> Marker {
        Marker {
            picture: picture.map(PathBuf::from),
            ..Marker::new(number, format!("m{number}"), "00:00:01.000", "#fff")
        }
    }

    fn ids(element: &Element) -> Vec<&str> {
        element.elements().filter_map(Element::id).collect()
    }

    #[test]
    fn test_producers_are_inserted_before_last_playlist() {
        let doc = Document::parse(
            r#"<mlt><producer id="producer1"/><playlist id="main_bin"/><producer id="producer3"/><playlist id="playlist0"/><tractor id="tractor0"/></mlt>"#,
        )
        .unwrap();
        let store = MarkerStore::from_markers(vec![
            marker(1, Some("/media/one.png")),
            marker(2, None),
            marker(3, Some("/media/three.jpg")),
        ]);

        let outcome = synthesize_producers(
            &doc,
            &store,
            &SuffixIdAllocator::default(),
            &SynthesisOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.created_ids, vec!["producer4", "producer5"]);
        assert_eq!(
            ids(&outcome.document.root),
            vec!["producer1", "main_bin", "producer3", "producer4", "producer5", "playlist0", "tractor0"]
        );
        assert_eq!(
            outcome.warnings,
            vec![SynthesisWarning::MissingAsset {
                number: 2,
                name: "m2".to_string()
            }]
        );
        // 原文档不受影响
        assert_eq!(ids(&doc.root).len(), 5);
    }

    #[test]
    fn test_producer_properties() {
        let doc = Document::parse("<mlt/>").unwrap();
        let store = MarkerStore::from_markers(vec![marker(1, Some("/media/intro shot.png"))]);
        let outcome = synthesize_producers(
            &doc,
            &store,
            &SuffixIdAllocator::default(),
            &SynthesisOptions::default(),
        )
        .unwrap();

        let producer = outcome.document.root.elements().next().unwrap();
        assert_eq!(producer.id(), Some("producer1"));
        assert_eq!(producer.attribute("in"), Some("00:00:00.000"));
        assert_eq!(producer.attribute("out"), Some("03:59:59.960"));
        assert_eq!(producer.property("resource").as_deref(), Some("/media/intro shot.png"));
        assert_eq!(producer.property("mlt_service").as_deref(), Some("qimage"));
        assert_eq!(producer.property("eof").as_deref(), Some("pause"));
        assert_eq!(producer.property("length").as_deref(), Some("04:00:00.000"));
        assert_eq!(producer.property("meta.media.width").as_deref(), Some("1920"));
        assert_eq!(producer.property("shotcut:caption").as_deref(), Some("intro shot.png"));

        let hash = producer.property("shotcut:hash").unwrap();
        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_invalid_option_timecode_aborts() {
        let doc = Document::parse("<mlt/>").unwrap();
        let options = SynthesisOptions {
            producer_length: "4h".to_string(),
            ..Default::default()
        };
        let store = MarkerStore::from_markers(vec![marker(1, Some("/a.png"))]);
        assert!(matches!(
            synthesize_producers(&doc, &store, &SuffixIdAllocator::default(), &options),
            Err(MltError::InvalidTimecode(_))
        ));
    }
}
