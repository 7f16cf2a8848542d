//! # MLT 文档序列化
//!
//! 以两个空格缩进输出元素树，去掉底层写入器可能产生的空行。

use std::io::Cursor;

use mlt_core::MltError;
use quick_xml::{
    Writer,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::document::{Document, Element, Node};

/// 将文档序列化为格式化的 XML 文本。
///
/// 只含文本的元素保持在同一行，没有子节点的元素输出为自闭合标签，
/// 属性按内存中的顺序输出。结果以换行结尾。
///
/// # Errors
///
/// 写入 XML 或将结果转换为 UTF-8 字符串失败时返回错误。
pub fn serialize_document(document: &Document) -> Result<String, MltError> {
    let mut buffer = Vec::new();
    {
        let mut writer = Writer::new_with_indent(Cursor::new(&mut buffer), b' ', 2);

        if let Some(decl) = &document.declaration {
            writer.write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                decl.standalone.as_deref(),
            )))?;
        }
        write_element(&mut writer, &document.root)?;
    }

    let raw = String::from_utf8(buffer)?;
    Ok(strip_blank_lines(&raw))
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &Element,
) -> Result<(), MltError> {
    let start = BytesStart::new(element.name.as_str()).with_attributes(
        element
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())),
    );

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            Node::CData(text) => writer.write_event(Event::CData(BytesCData::new(text)))?,
            Node::Comment(text) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

fn strip_blank_lines(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len() + 1);
    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}
