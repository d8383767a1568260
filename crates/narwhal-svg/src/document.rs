use crate::{Error, Result};
use narwhal::ElementView;
use std::borrow::Cow;
use std::ops::Range;

/// A parsed SVG document. Borrows the source text.
pub struct SvgDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl std::fmt::Debug for SvgDocument<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgDocument")
            .field("root", &self.root().map(|n| n.path()))
            .finish()
    }
}

impl<'input> SvgDocument<'input> {
    pub fn parse(text: &'input str) -> Result<Self> {
        let doc = roxmltree::Document::parse(text)?;
        tracing::trace!(bytes = text.len(), "parsed svg document");
        Ok(Self { doc })
    }

    pub fn source(&self) -> &'input str {
        self.doc.input_text()
    }

    /// The outermost `<svg>` element.
    pub fn root(&self) -> Result<SvgNode<'_, 'input>> {
        self.doc
            .descendants()
            .find(|n| n.has_tag_name("svg"))
            .map(SvgNode::new)
            .ok_or(Error::MissingSvgRoot)
    }

    pub fn find_by_id(&self, id: &str) -> Option<SvgNode<'_, 'input>> {
        self.doc
            .descendants()
            .find(|n| n.is_element() && n.attribute("id") == Some(id))
            .map(SvgNode::new)
    }

    /// Every element in document order, starting at the `<svg>` root.
    pub fn elements(&self) -> Result<Vec<SvgNode<'_, 'input>>> {
        let root = self.root()?;
        Ok(root
            .node
            .descendants()
            .filter(|n| n.is_element())
            .map(SvgNode::new)
            .collect())
    }
}

/// An element of an [`SvgDocument`], viewed through [`ElementView`].
#[derive(Debug, Clone, Copy)]
pub struct SvgNode<'a, 'input> {
    node: roxmltree::Node<'a, 'input>,
}

impl<'a, 'input> SvgNode<'a, 'input> {
    fn new(node: roxmltree::Node<'a, 'input>) -> Self {
        Self { node }
    }

    pub fn id(&self) -> Option<&'a str> {
        self.node.attribute("id")
    }

    /// Byte offset of the element's start tag in the source text.
    pub fn source_start(&self) -> usize {
        self.node.range().start
    }

    /// Source byte range of the un-namespaced attribute `name`, spanning `name="value"`.
    pub(crate) fn attribute_range(&self, name: &str) -> Option<Range<usize>> {
        self.node
            .attributes()
            .find(|a| a.namespace().is_none() && a.name() == name)
            .map(|a| a.range())
    }

    /// Slash-separated `name[index]` path from the document root, indices counting element
    /// siblings only.
    pub fn path(&self) -> String {
        let mut parts = self
            .node
            .ancestors()
            .filter(|n| n.is_element())
            .map(|n| {
                let index = n.prev_siblings().skip(1).filter(|s| s.is_element()).count();
                format!("{}[{}]", n.tag_name().name(), index)
            })
            .collect::<Vec<_>>();
        parts.reverse();
        parts.join("/")
    }
}

impl ElementView for SvgNode<'_, '_> {
    fn tag_name(&self) -> &str {
        self.node.tag_name().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.node.attribute(name)
    }

    fn text_content(&self) -> Cow<'_, str> {
        let mut texts = self
            .node
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text());
        let Some(first) = texts.next() else {
            return Cow::Borrowed("");
        };
        match texts.next() {
            None => Cow::Borrowed(first),
            Some(second) => {
                let mut out = String::from(first);
                out.push_str(second);
                texts.for_each(|t| out.push_str(t));
                Cow::Owned(out)
            }
        }
    }

    fn children(&self) -> Vec<Self> {
        self.node
            .children()
            .filter(|n| n.is_element())
            .map(SvgNode::new)
            .collect()
    }

    fn node_key(&self) -> Option<usize> {
        Some(self.node.id().get_usize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_counts_element_siblings_only() {
        let doc = SvgDocument::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><!-- c --><g/> text <g><rect id="r"/></g></svg>"#,
        )
        .expect("parse");
        let r = doc.find_by_id("r").expect("rect");
        assert_eq!(r.path(), "svg[0]/g[1]/rect[0]");
    }

    #[test]
    fn text_content_joins_nested_text_nodes() {
        let doc = SvgDocument::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><text id="t">a<tspan>b</tspan>c</text></svg>"#,
        )
        .expect("parse");
        let t = doc.find_by_id("t").expect("text");
        assert_eq!(t.text_content(), "abc");
    }
}
