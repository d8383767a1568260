//! Read-only element capability and an owned element tree.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// What the resolver needs to read from a document node.
///
/// Implementations must not fail: a missing attribute is `None`, a node without text yields an
/// empty string, and a leaf has no children. `children` returns element children only, in
/// document order.
pub trait ElementView: Sized {
    fn tag_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Concatenated text of this node and all of its descendants.
    fn text_content(&self) -> Cow<'_, str>;

    fn children(&self) -> Vec<Self>;

    /// Identity of the node within one document, if the model can provide one.
    ///
    /// Used by [`crate::CachedResolver`]; `None` disables caching for the node.
    fn node_key(&self) -> Option<usize> {
        None
    }
}

/// An owned, in-memory element. `&Element` implements [`ElementView`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attrs.insert(key.into(), value.to_string());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(t) = &self.text {
            out.push_str(t);
        }
        for c in &self.children {
            c.collect_text(out);
        }
    }
}

impl ElementView for &Element {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn text_content(&self) -> Cow<'_, str> {
        if self.children.is_empty() {
            return Cow::Borrowed(self.text.as_deref().unwrap_or(""));
        }
        let mut out = String::new();
        self.collect_text(&mut out);
        Cow::Owned(out)
    }

    fn children(&self) -> Vec<Self> {
        self.children.iter().collect()
    }

    fn node_key(&self) -> Option<usize> {
        Some(std::ptr::from_ref::<Element>(*self) as usize)
    }
}
