//! # 标记提取
//!
//! Shotcut 把时间线标记保存在主 tractor 的
//! `<properties name="shotcut:markers">` 区段中，每条标记是一个子 `<properties>`：
//!
//! ```xml
//! <properties name="shotcut:markers">
//!   <properties name="0">
//!     <property name="text">Intro</property>
//!     <property name="start">00:00:05.000</property>
//!     <property name="end">00:00:05.000</property>
//!     <property name="color">#008000</property>
//!   </properties>
//! </properties>
//! ```

use mlt_core::{Marker, MarkerStore, SynthesisWarning};
use tracing::{debug, warn};

use crate::document::{
    Document, Element,
    constants::{
        PROP_MARKER_COLOR, PROP_MARKER_END, PROP_MARKER_START, PROP_MARKER_TEXT, TAG_PROPERTIES,
    },
};

/// 标记提取的结果。
#[derive(Debug, Clone, Default)]
pub struct MarkerExtraction {
    pub store: MarkerStore,
    pub warnings: Vec<SynthesisWarning>,
    /// 文档中是否存在标记区段。
    pub section_found: bool,
}

/// 从文档中提取标记。
///
/// 缺少标记区段时返回空集合并附带 [`SynthesisWarning::MarkersNotFound`]。
/// 单条记录缺少必需字段时只跳过这一条，后续记录继续提取。
/// 开始时间格式错误的记录仍会返回，同时给出警告，由后续步骤决定是否使用。
#[must_use]
pub fn extract_markers(document: &Document) -> MarkerExtraction {
    let Some(section) = document.markers_section() else {
        warn!("文档中未找到标记区段");
        return MarkerExtraction {
            warnings: vec![SynthesisWarning::MarkersNotFound],
            ..Default::default()
        };
    };

    let mut store = MarkerStore::new();
    let mut warnings = Vec::new();

    for (index, entry) in section.elements_named(TAG_PROPERTIES).enumerate() {
        let number = index + 1;
        match read_marker(entry, number) {
            Ok(marker) => {
                if !marker.has_valid_start() {
                    warn!("标记 #{number} 的开始时间 '{}' 无效", marker.start_time);
                    warnings.push(SynthesisWarning::InvalidMarkerTime {
                        number,
                        value: marker.start_time.clone(),
                    });
                }
                store.push(marker);
            }
            Err(missing_field) => {
                warn!("第 {number} 条标记缺少字段 '{missing_field}'，已跳过");
                warnings.push(SynthesisWarning::MarkerExtraction {
                    position: number,
                    missing_field,
                });
            }
        }
    }

    debug!("提取到 {} 条标记", store.len());

    MarkerExtraction {
        store,
        warnings,
        section_found: true,
    }
}

/// 读取一条标记，缺少字段时返回字段名。
fn read_marker(entry: &Element, number: usize) -> Result<Marker, &'static str> {
    let required = |field: &'static str| entry.property(field).ok_or(field);

    let name = required(PROP_MARKER_TEXT)?;
    let start_time = required(PROP_MARKER_START)?.trim().to_string();
    let color = required(PROP_MARKER_COLOR)?;
    let end_time = entry
        .property(PROP_MARKER_END)
        .map(|e| e.trim().to_string());

    Ok(Marker {
        end_time,
        ..Marker::new(number, name, start_time, color)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_xml(name: Option<&str>, start: Option<&str>, color: Option<&str>) -> String {
        let mut xml = String::from("<properties name=\"x\">");
        if let Some(name) = name {
            xml.push_str(&format!("<property name=\"text\">{name}</property>"));
        }
        if let Some(start) = start {
            xml.push_str(&format!("<property name=\"start\">{start}</property>"));
            xml.push_str(&format!("<property name=\"end\">{start}</property>"));
        }
        if let Some(color) = color {
            xml.push_str(&format!("<property name=\"color\">{color}</property>"));
        }
        xml.push_str("</properties>");
        xml
    }

    fn document_with(entries: &[String]) -> Document {
        Document::parse(&format!(
            "<mlt><tractor><properties name=\"shotcut:markers\">{}</properties></tractor></mlt>",
            entries.concat()
        ))
        .unwrap()
    }

    #[test]
    fn test_extracts_in_document_order() {
        let doc = document_with(&[
            marker_xml(Some("B"), Some("00:00:10.000"), Some("#ff0000")),
            marker_xml(Some("A"), Some("00:00:05.000"), Some("#00ff00")),
        ]);
        let result = extract_markers(&doc);

        assert!(result.section_found);
        assert!(result.warnings.is_empty());
        let markers = result.store.as_slice();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].number, 1);
        assert_eq!(markers[0].name, "B");
        assert_eq!(markers[0].end_time.as_deref(), Some("00:00:10.000"));
        assert_eq!(markers[1].number, 2);
        assert_eq!(markers[1].color, "#00ff00");
        assert!(markers[1].picture.is_none());
    }

    #[test]
    fn test_missing_section_is_not_fatal() {
        let doc = Document::parse("<mlt><tractor/></mlt>").unwrap();
        let result = extract_markers(&doc);
        assert!(!result.section_found);
        assert!(result.store.is_empty());
        assert_eq!(result.warnings, vec![SynthesisWarning::MarkersNotFound]);
    }

    #[test]
    fn test_partial_success_on_bad_records() {
        let doc = document_with(&[
            marker_xml(Some("ok"), Some("00:00:01.000"), Some("#fff")),
            marker_xml(Some("no start"), None, Some("#fff")),
            marker_xml(Some("bad time"), Some("1.5s"), Some("#fff")),
            marker_xml(None, Some("00:00:02.000"), Some("#fff")),
            marker_xml(Some("last"), Some("00:00:03.000"), Some("#fff")),
        ]);
        let result = extract_markers(&doc);

        let numbers: Vec<usize> = result.store.iter().map(|m| m.number).collect();
        assert_eq!(numbers, vec![1, 3, 5]);
        assert_eq!(
            result.warnings,
            vec![
                SynthesisWarning::MarkerExtraction {
                    position: 2,
                    missing_field: "start"
                },
                SynthesisWarning::InvalidMarkerTime {
                    number: 3,
                    value: "1.5s".to_string()
                },
                SynthesisWarning::MarkerExtraction {
                    position: 4,
                    missing_field: "text"
                },
            ]
        );
    }
}
