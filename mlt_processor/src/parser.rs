//! # MLT 文档解析器
//!
//! 使用 `quick-xml` 的流式读取器把 XML 文本构造成 [`Document`] 元素树。
//! 只检查格式良好性，不校验 MLT 的 schema。

use std::str;

use mlt_core::MltError;
use quick_xml::{
    Reader,
    events::{BytesDecl, BytesRef, BytesStart, Event},
};
use tracing::{debug, error};

use crate::document::{Declaration, Document, Element, Node};

/// 解析 MLT 工程文件内容。
///
/// 元素之间仅含空白的文本节点会被丢弃，其余文本原样保留。
/// 元素的全部内容只有一段不换行的空白时（如 `<property name="x"> </property>`），
/// 这段空白是值，同样保留。
///
/// # Errors
///
/// * `MltError::Xml` / `MltError::Attribute` - 底层读取器报告的语法错误
/// * `MltError::Parse` - 缺少根元素、存在多个根元素、标签未闭合或根元素外有文本
pub fn parse_document(content: &str) -> Result<Document, MltError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);
    reader.config_mut().expand_empty_elements = false;

    let mut declaration = None;
    let mut root: Option<Element> = None;
    let mut stack: Vec<Element> = Vec::new();
    let mut pending_text = String::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                error!("MLT 解析错误，位置 {}: {}", reader.error_position(), e);
                return Err(MltError::Xml(e));
            }
        };

        match event {
            Event::Decl(decl) => declaration = Some(read_declaration(&decl)?),
            Event::Start(start) => {
                flush_text(&mut pending_text, &mut stack)?;
                stack.push(read_element_start(&start, &reader)?);
            }
            Event::Empty(start) => {
                flush_text(&mut pending_text, &mut stack)?;
                let element = read_element_start(&start, &reader)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                keep_whitespace_value(&mut pending_text, &mut stack);
                flush_text(&mut pending_text, &mut stack)?;
                let element = stack
                    .pop()
                    .ok_or_else(|| MltError::Parse("出现了没有对应开始标签的结束标签".into()))?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let decoded = text.xml_content().map_err(|e| MltError::Parse(e.to_string()))?;
                pending_text.push_str(&decoded);
            }
            Event::GeneralRef(reference) => pending_text.push(resolve_reference(&reference)?),
            Event::CData(cdata) => {
                flush_text(&mut pending_text, &mut stack)?;
                let decoded = cdata.decode().map_err(|e| MltError::Parse(e.to_string()))?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::CData(decoded.into_owned()));
                }
            }
            Event::Comment(comment) => {
                flush_text(&mut pending_text, &mut stack)?;
                let decoded = comment.decode().map_err(|e| MltError::Parse(e.to_string()))?;
                // 根元素之外的注释不保留
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Comment(decoded.into_owned()));
                }
            }
            Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    flush_text(&mut pending_text, &mut stack)?;

    if let Some(unclosed) = stack.last() {
        return Err(MltError::Parse(format!("元素 <{}> 没有闭合", unclosed.name)));
    }

    let root = root.ok_or_else(|| MltError::Parse("文档中没有根元素".into()))?;
    debug!(
        "解析完成，根元素 <{}> 含 {} 个子节点",
        root.name,
        root.children.len()
    );

    Ok(Document { declaration, root })
}

fn read_declaration(decl: &BytesDecl) -> Result<Declaration, MltError> {
    let to_string = |bytes: &[u8]| {
        str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| MltError::Parse(format!("XML 声明不是有效的 UTF-8: {e}")))
    };

    let version = to_string(&decl.version()?)?;
    let encoding = decl.encoding().transpose()?.map(|e| to_string(&e)).transpose()?;
    let standalone = decl
        .standalone()
        .transpose()?
        .map(|s| to_string(&s))
        .transpose()?;

    Ok(Declaration {
        version,
        encoding,
        standalone,
    })
}

fn read_element_start(start: &BytesStart, reader: &Reader<&[u8]>) -> Result<Element, MltError> {
    let name = str::from_utf8(start.name().as_ref())
        .map_err(|e| MltError::Parse(format!("元素名不是有效的 UTF-8: {e}")))?
        .to_string();

    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr?;
        let key = str::from_utf8(attr.key.as_ref())
            .map_err(|e| MltError::Parse(format!("属性名不是有效的 UTF-8: {e}")))?
            .to_string();
        let value = attr.decode_and_unescape_value(reader.decoder())?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

/// 把累积的文本作为子节点挂到当前元素上；仅含空白的文本直接丢弃。
fn flush_text(pending: &mut String, stack: &mut [Element]) -> Result<(), MltError> {
    if pending.chars().all(char::is_whitespace) {
        pending.clear();
        return Ok(());
    }

    let Some(parent) = stack.last_mut() else {
        return Err(MltError::Parse(format!(
            "根元素之外出现了文本 '{}'",
            pending.trim()
        )));
    };
    parent.children.push(Node::Text(std::mem::take(pending)));
    Ok(())
}

/// 元素结束时，若它还没有任何子节点且累积的是一段不换行的空白，就把空白作为文本保留。
///
/// 含换行的空白只能是缩进，序列化时也无法原样写回，因此仍交给 [`flush_text`] 丢弃。
fn keep_whitespace_value(pending: &mut String, stack: &mut [Element]) {
    if pending.is_empty()
        || pending.contains(['\n', '\r'])
        || !pending.chars().all(char::is_whitespace)
    {
        return;
    }
    if let Some(parent) = stack.last_mut().filter(|p| p.children.is_empty()) {
        parent.children.push(Node::Text(std::mem::take(pending)));
    }
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), MltError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(MltError::Parse(format!(
            "文档包含多个根元素，多余的元素为 <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

/// 解析实体引用，例如 `&amp;` 或 `&#x4E2D;`。
fn resolve_reference(reference: &BytesRef) -> Result<char, MltError> {
    let entity_name = str::from_utf8(reference.as_ref())
        .map_err(|e| MltError::Parse(format!("无法将实体名解码为UTF-8: {e}")))?;

    if let Some(num_str) = entity_name.strip_prefix('#') {
        let (radix, code_point_str) = num_str
            .strip_prefix('x')
            .map_or((10, num_str), |stripped| (16, stripped));
        return u32::from_str_radix(code_point_str, radix)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| MltError::Parse(format!("无效的XML数字实体 '&{entity_name};'")));
    }

    match entity_name {
        "amp" => Ok('&'),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        _ => Err(MltError::Parse(format!("未知的XML实体 '&{entity_name};'"))),
    }
}
