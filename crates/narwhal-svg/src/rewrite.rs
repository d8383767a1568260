//! Minimal in-place edits of the root start tag.
//!
//! Only the `<svg ...>` start tag is rewritten; the rest of the markup is passed through byte for
//! byte so the output diff stays limited to the viewport attributes.

use crate::{Result, SvgDocument, SvgNode};
use narwhal::{BoxResolver, ElementView, Viewport, fit_viewport};
use std::ops::Range;

/// Byte offset one past the start tag's closing `>` (quotes are honored).
fn start_tag_end(src: &str, start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in src.as_bytes().iter().enumerate().skip(start) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Escapes a value for a double-quoted attribute.
fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Offset inside the start tag `src[start..end]` where a new attribute goes: after the last
/// non-space byte before `>` or `/>`.
fn insertion_point(src: &str, start: usize, end: usize) -> usize {
    let tag = &src[start..end];
    let close = if tag.ends_with("/>") {
        tag.len() - 2
    } else {
        tag.len() - 1
    };
    start + tag[..close].trim_end().len()
}

/// Applies non-overlapping `(range, replacement)` edits to `src`.
fn splice(src: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(r, _)| r.start);
    let mut out = String::with_capacity(src.len() + 64);
    let mut cursor = 0usize;
    for (r, text) in edits {
        out.push_str(&src[cursor..r.start]);
        out.push_str(&text);
        cursor = r.end;
    }
    out.push_str(&src[cursor..]);
    out
}

/// Replaces any `max-width` declaration in an inline style with `decl`.
fn merge_max_width(style: Option<&str>, decl: &str) -> String {
    let mut parts = style
        .unwrap_or("")
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .filter(|d| {
            d.split(':')
                .next()
                .is_none_or(|prop| !prop.trim().eq_ignore_ascii_case("max-width"))
        })
        .map(|d| format!("{d};"))
        .collect::<Vec<_>>();
    parts.push(decl.to_string());
    parts.join(" ")
}

/// Writes `viewport` into the root `<svg>` start tag of `doc`'s source.
///
/// Existing `viewBox`/`style` attributes are located through the parsed tree and rewritten whole
/// as `key="value"`; missing ones are appended to the start tag.
pub fn apply_viewport(doc: &SvgDocument<'_>, viewport: &Viewport) -> Result<String> {
    let root = doc.root()?;
    let src = doc.source();
    let start = root.source_start();
    let Some(end) = start_tag_end(src, start) else {
        tracing::warn!(start, "unterminated root start tag; leaving markup unchanged");
        return Ok(src.to_string());
    };

    let style = merge_max_width(root.attribute("style"), &viewport.max_width_style());
    let mut edits = Vec::new();
    let mut appended = String::new();
    for (key, value) in [("viewBox", viewport.view_box_attr()), ("style", style)] {
        let attr = format!("{key}=\"{}\"", escape_attr(&value));
        match root.attribute_range(key) {
            Some(range) => edits.push((range, attr)),
            None => {
                appended.push(' ');
                appended.push_str(&attr);
            }
        }
    }
    if !appended.is_empty() {
        let at = insertion_point(src, start, end);
        edits.push((at..at, appended));
    }
    Ok(splice(src, edits))
}

/// Parses `svg`, fits its root viewport with `resolver`, and returns the rewritten markup.
pub fn fit_svg<R>(svg: &str, resolver: &R, padding: f64) -> Result<(String, Viewport)>
where
    R: for<'a, 'i> BoxResolver<SvgNode<'a, 'i>>,
{
    let doc = SvgDocument::parse(svg)?;
    let root = doc.root()?;
    let viewport = fit_viewport(&root, resolver, padding);
    tracing::debug!(view_box = %viewport.view_box_attr(), "fitted svg root");
    let out = apply_viewport(&doc, &viewport)?;
    Ok((out, viewport))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_tag_end_skips_quoted_gt() {
        let src = r#"<svg data-x="a>b" id='c>d'><g/></svg>"#;
        let end = start_tag_end(src, 0).expect("end");
        assert_eq!(&src[..end], r#"<svg data-x="a>b" id='c>d'>"#);
    }

    fn fit(src: &str) -> String {
        let doc = SvgDocument::parse(src).expect("parse");
        let vp = Viewport {
            content: narwhal::BBox::new(1.0, 2.0, 3.0, 4.0),
            view_box: narwhal::BBox::new(1.0, 2.0, 3.0, 4.0),
            padding: 0.0,
        };
        apply_viewport(&doc, &vp).expect("apply")
    }

    #[test]
    fn replaces_existing_attributes_in_place() {
        assert_eq!(
            fit(r#"<svg viewBox="0 0 1 1" style="color: red"><g/></svg>"#),
            r#"<svg viewBox="1 2 3 4" style="color: red; max-width: 3px;"><g/></svg>"#
        );
    }

    #[test]
    fn appends_missing_attributes() {
        assert_eq!(
            fit(r#"<svg id="x"><g/></svg>"#),
            r#"<svg id="x" viewBox="1 2 3 4" style="max-width: 3px;"><g/></svg>"#
        );
        assert_eq!(
            fit(r#"<svg id="x" />"#),
            r#"<svg id="x" viewBox="1 2 3 4" style="max-width: 3px;" />"#
        );
    }

    #[test]
    fn similarly_named_attributes_are_left_alone() {
        assert_eq!(
            fit(r#"<svg data-style="keep"><g/></svg>"#),
            r#"<svg data-style="keep" viewBox="1 2 3 4" style="max-width: 3px;"><g/></svg>"#
        );
    }

    #[test]
    fn single_quoted_values_are_requoted() {
        assert_eq!(
            fit(r#"<svg viewBox='0 0 1 1'><g/></svg>"#),
            r#"<svg viewBox="1 2 3 4" style="max-width: 3px;"><g/></svg>"#
        );
    }

    #[test]
    fn merge_max_width_replaces_existing_declaration() {
        assert_eq!(
            merge_max_width(Some("background: white; max-width: 10px;"), "max-width: 46px;"),
            "background: white; max-width: 46px;"
        );
        assert_eq!(merge_max_width(None, "max-width: 1px;"), "max-width: 1px;");
    }
}
