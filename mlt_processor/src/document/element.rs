//! # MLT 文档 - 元素树
//!
//! 解析后的 XML 以一棵简单的元素树保存，属性和子节点都保持源文件中的顺序。

use super::constants::{ATTR_ID, ATTR_NAME, TAG_PROPERTY};

/// 元素的子节点。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
}

impl Node {
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    pub const fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// 一个 XML 元素。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// 追加一个 `<property name="...">value</property>` 子元素。
    #[must_use]
    pub fn with_property(mut self, name: &str, value: impl Into<String>) -> Self {
        self.children.push(Node::Element(property_element(name, value)));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 设置属性值，已存在的属性保持原来的位置。
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.attributes.push((key, value));
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attribute(ATTR_ID)
    }

    /// 直接子元素。
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// 指定名称的直接子元素。
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> {
        self.elements().filter(move |e| e.is(name))
    }

    /// 指定名称的最后一个直接子元素在 `children` 中的下标。
    #[must_use]
    pub fn last_child_index(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .rposition(|n| n.as_element().is_some_and(|e| e.is(name)))
    }

    /// 直接文本内容（包括 CDATA）。
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// 读取 `<property name="...">` 子元素的文本。
    #[must_use]
    pub fn property(&self, name: &str) -> Option<String> {
        self.elements_named(TAG_PROPERTY)
            .find(|p| p.attribute(ATTR_NAME) == Some(name))
            .map(Self::text)
    }

    /// 以先序遍历的方式迭代自身及所有后代元素。
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// 构造 `<property name="...">value</property>`。
pub fn property_element(name: &str, value: impl Into<String>) -> Element {
    let value = value.into();
    let element = Element::new(TAG_PROPERTY).with_attribute(ATTR_NAME, name);
    if value.is_empty() {
        element
    } else {
        element.with_text(value)
    }
}

/// [`Element::descendants`] 返回的迭代器。
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // 逆序压栈，保证按文档顺序弹出
        self.stack
            .extend(current.children.iter().rev().filter_map(Node::as_element));
        Some(current)
    }
}
