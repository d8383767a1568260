//! Root viewport fitting, the last step of a headless layout pass.
//!
//! After layout, the root `viewBox` is derived from the content box of the root's children plus
//! a uniform padding, and `max-width` is pinned to the padded width.

use crate::bbox::BBox;
use crate::element::ElementView;
use crate::resolve::BoxResolver;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Unpadded union of the root's children.
    pub content: BBox,
    pub view_box: BBox,
    pub padding: f64,
}

impl Viewport {
    pub fn view_box_attr(&self) -> String {
        let b = self.view_box;
        format!("{} {} {} {}", b.x, b.y, b.width, b.height)
    }

    pub fn max_width_style(&self) -> String {
        format!("max-width: {}px;", self.view_box.width)
    }
}

/// Fits a viewport around the children of `root`.
///
/// The root's own attributes and transform are ignored: a root `<svg>` usually carries the
/// viewport being computed. A root without finite content is fitted around
/// [`BBox::DEGENERATE`].
pub fn fit_viewport<E>(root: &E, resolver: &dyn BoxResolver<E>, padding: f64) -> Viewport
where
    E: ElementView,
{
    let padding = if padding.is_finite() { padding } else { 0.0 };
    let boxes = root
        .children()
        .iter()
        .map(|c| resolver.resolve(c))
        .collect::<Vec<_>>();
    let content = BBox::union_all(&boxes).unwrap_or(BBox::DEGENERATE);
    let view_box = content.inflate(padding);
    tracing::debug!(?content, ?view_box, padding, "fitted root viewport");
    Viewport {
        content,
        view_box,
        padding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::resolve::BBoxResolver;

    #[test]
    fn padded_view_box_formats_like_an_attribute() {
        let root = Element::new("svg")
            .attr("width", "100%")
            .attr("height", 300)
            .child(
                Element::new("g")
                    .attr("transform", "translate(10, 20)")
                    .child(Element::new("rect").attr("width", 30).attr("height", 40)),
            );
        let vp = fit_viewport(&&root, &BBoxResolver::default(), 8.0);
        assert_eq!(vp.content, BBox::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(vp.view_box_attr(), "2 12 46 56");
        assert_eq!(vp.max_width_style(), "max-width: 46px;");
    }

    #[test]
    fn empty_root_fits_degenerate_box() {
        let root = Element::new("svg");
        let vp = fit_viewport(&&root, &BBoxResolver::default(), 0.0);
        assert_eq!(vp.view_box, BBox::DEGENERATE);
    }
}
