//! # 结构合并规则
//!
//! 所有合成步骤都通过这里把新元素插入文档：
//!
//! | 元素 | 插入位置 |
//! |---|---|
//! | producer | 最后一个播放列表之前（没有播放列表时追加到根元素末尾） |
//! | playlist | 最后一个播放列表之后（没有播放列表时放在主 tractor 之前） |
//! | track | 主 tractor 中最后一个轨道之后 |
//! | transition | 主 tractor 的末尾 |
//!
//! MLT 要求被引用的元素先声明，这些位置保证了引用关系始终有效。

use mlt_core::MltError;

use crate::document::{
    Document, Element, Node,
    constants::{TAG_PROPERTIES, TAG_PROPERTY, TAG_TRACK},
};

pub(crate) fn insert_producer(document: &mut Document, producer: Element) {
    let index = document
        .last_playlist_index()
        .unwrap_or(document.root.children.len());
    document.root.children.insert(index, Node::Element(producer));
}

pub(crate) fn insert_playlist(document: &mut Document, playlist: Element) -> Result<(), MltError> {
    let index = match document.last_playlist_index() {
        Some(last) => last + 1,
        None => document.main_tractor_index().ok_or_else(|| {
            MltError::structure("既没有播放列表也没有主 tractor，无法确定播放列表的插入位置")
        })?,
    };
    document.root.children.insert(index, Node::Element(playlist));
    Ok(())
}

pub(crate) fn insert_track(document: &mut Document, track: Element) -> Result<(), MltError> {
    let tractor = document
        .main_tractor_mut()
        .ok_or_else(|| MltError::structure("找不到主 tractor，无法插入轨道"))?;

    let index = tractor
        .last_child_index(TAG_TRACK)
        .map_or_else(|| leading_properties_len(tractor), |last| last + 1);
    tractor.children.insert(index, Node::Element(track));
    Ok(())
}

pub(crate) fn append_transition(
    document: &mut Document,
    transition: Element,
) -> Result<(), MltError> {
    let tractor = document
        .main_tractor_mut()
        .ok_or_else(|| MltError::structure("找不到主 tractor，无法追加 transition"))?;
    tractor.children.push(Node::Element(transition));
    Ok(())
}

/// tractor 开头连续的属性节点数量，新轨道排在它们之后。
fn leading_properties_len(tractor: &Element) -> usize {
    tractor
        .children
        .iter()
        .take_while(|n| match n {
            Node::Element(e) => e.is(TAG_PROPERTY) || e.is(TAG_PROPERTIES),
            Node::Comment(_) => true,
            _ => false,
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(element: &Element) -> Vec<String> {
        element
            .elements()
            .map(|e| e.id().unwrap_or(&e.name).to_string())
            .collect()
    }

    #[test]
    fn test_insertion_points() {
        let mut doc = Document::parse(
            r#"<mlt><producer id="producer0"/><playlist id="playlist0"/><playlist id="playlist1"/><tractor id="tractor0"><property name="shotcut">1</property><track producer="playlist0"/><transition id="transition0"/></tractor></mlt>"#,
        )
        .unwrap();

        insert_producer(&mut doc, Element::new("producer").with_attribute("id", "producer1"));
        insert_playlist(&mut doc, Element::new("playlist").with_attribute("id", "playlist2"))
            .unwrap();
        insert_track(&mut doc, Element::new("track")).unwrap();
        append_transition(&mut doc, Element::new("transition").with_attribute("id", "transition1"))
            .unwrap();

        assert_eq!(
            names(&doc.root),
            vec!["producer0", "playlist0", "producer1", "playlist1", "playlist2", "tractor0"]
        );
        assert_eq!(
            names(doc.main_tractor().unwrap()),
            vec!["property", "track", "track", "transition0", "transition1"]
        );
    }

    #[test]
    fn test_fallbacks_without_playlists_or_tracks() {
        let mut doc =
            Document::parse(r#"<mlt><tractor id="tractor0"><property name="a">1</property><transition id="transition0"/></tractor></mlt>"#)
                .unwrap();

        insert_playlist(&mut doc, Element::new("playlist").with_attribute("id", "playlist1"))
            .unwrap();
        insert_producer(&mut doc, Element::new("producer").with_attribute("id", "producer1"));
        insert_track(&mut doc, Element::new("track")).unwrap();

        assert_eq!(names(&doc.root), vec!["producer1", "playlist1", "tractor0"]);
        assert_eq!(
            names(doc.main_tractor().unwrap()),
            vec!["property", "track", "transition0"]
        );
    }

    #[test]
    fn test_missing_tractor_is_structural_error() {
        let mut doc = Document::parse("<mlt><producer id=\"producer0\"/></mlt>").unwrap();
        assert!(matches!(
            insert_playlist(&mut doc, Element::new("playlist")),
            Err(MltError::Structure(_))
        ));
        assert!(matches!(
            insert_track(&mut doc, Element::new("track")),
            Err(MltError::Structure(_))
        ));
        assert!(matches!(
            append_transition(&mut doc, Element::new("transition")),
            Err(MltError::Structure(_))
        ));

        insert_producer(&mut doc, Element::new("producer").with_attribute("id", "producer1"));
        assert_eq!(names(&doc.root), vec!["producer0", "producer1"]);
    }
}
