//! `getBBox()`-style box resolution from attributes and transforms alone.
//!
//! Element kinds are decided by which attributes are present (there is no type tag to trust in
//! generated SVG), in a fixed priority order: text, rect-like, circle-like, ellipse-like,
//! container, then the 1×1 fallback. The local box is then mapped through the element's own
//! `transform` so the result is expressed in the parent's coordinate space.

use crate::bbox::BBox;
use crate::config::ResolverConfig;
use crate::element::ElementView;
use crate::geom::parse_number;
use crate::transform::parse_transform;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ElementKind {
    /// `len` counts UTF-16 code units, so astral-plane characters weigh two.
    Text {
        len: usize,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Container,
    Unknown,
}

/// Box-query capability handed to layout code.
///
/// Layout steps take a `&dyn BoxResolver<E>` (or a generic `R: BoxResolver<E>`) instead of
/// reaching for any ambient renderer.
pub trait BoxResolver<E: ElementView> {
    /// Box of `element` and its descendants, in the parent's coordinate space.
    fn resolve(&self, element: &E) -> BBox;
}

#[derive(Debug, Clone, Default)]
pub struct BBoxResolver {
    config: ResolverConfig,
}

impl BBoxResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn classify<E: ElementView>(&self, element: &E) -> ElementKind {
        if self.config.is_text_tag(element.tag_name()) {
            let len = element.text_content().trim().encode_utf16().count();
            return ElementKind::Text { len };
        }

        let num = |name: &str| element.attribute(name).and_then(parse_number);

        if let (Some(width), Some(height)) = (num("width"), num("height")) {
            return ElementKind::Rect {
                x: num("x").unwrap_or(0.0),
                y: num("y").unwrap_or(0.0),
                width,
                height,
            };
        }
        if let Some(r) = num("r") {
            return ElementKind::Circle {
                cx: num("cx").unwrap_or(0.0),
                cy: num("cy").unwrap_or(0.0),
                r,
            };
        }
        if let (Some(rx), Some(ry)) = (num("rx"), num("ry")) {
            return ElementKind::Ellipse {
                cx: num("cx").unwrap_or(0.0),
                cy: num("cy").unwrap_or(0.0),
                rx,
                ry,
            };
        }
        if !element.children().is_empty() {
            return ElementKind::Container;
        }
        ElementKind::Unknown
    }

    /// Box in the element's own coordinate space, before its `transform` is applied.
    ///
    /// Container children are resolved through `children_via`, so a caching resolver sees every
    /// descendant query.
    pub fn local_box_via<E, R>(&self, element: &E, kind: &ElementKind, children_via: &R) -> BBox
    where
        E: ElementView,
        R: BoxResolver<E> + ?Sized,
    {
        match *kind {
            ElementKind::Text { len } => BBox::new(
                0.0,
                0.0,
                len.max(1) as f64 * self.config.char_width,
                self.config.line_height,
            ),
            ElementKind::Rect {
                x,
                y,
                width,
                height,
            } => BBox::new(x, y, width, height),
            ElementKind::Circle { cx, cy, r } => BBox::new(cx - r, cy - r, 2.0 * r, 2.0 * r),
            ElementKind::Ellipse { cx, cy, rx, ry } => {
                BBox::new(cx - rx, cy - ry, 2.0 * rx, 2.0 * ry)
            }
            ElementKind::Container => {
                let boxes = element
                    .children()
                    .iter()
                    .map(|c| children_via.resolve(c))
                    .collect::<Vec<_>>();
                let excluded = boxes.iter().filter(|b| !b.is_finite()).count();
                if excluded > 0 {
                    tracing::debug!(
                        tag = element.tag_name(),
                        excluded,
                        "excluding non-finite child boxes from union"
                    );
                }
                BBox::union_all(&boxes).unwrap_or(BBox::DEGENERATE)
            }
            ElementKind::Unknown => BBox::DEGENERATE,
        }
    }

    pub fn local_box<E: ElementView>(&self, element: &E) -> BBox {
        let kind = self.classify(element);
        self.local_box_via(element, &kind, self)
    }

    /// Full resolution with child queries routed through `children_via`.
    pub fn resolve_via<E, R>(&self, element: &E, children_via: &R) -> BBox
    where
        E: ElementView,
        R: BoxResolver<E> + ?Sized,
    {
        let kind = self.classify(element);
        let local = self.local_box_via(element, &kind, children_via);
        let m = parse_transform(element.attribute("transform"));
        let out = local.transformed(&m);
        tracing::trace!(tag = element.tag_name(), ?kind, ?out, "resolved bbox");
        out
    }
}

impl<E: ElementView> BoxResolver<E> for BBoxResolver {
    fn resolve(&self, element: &E) -> BBox {
        self.resolve_via(element, self)
    }
}

/// Memoizes resolved boxes by [`ElementView::node_key`] for the duration of one layout pass.
///
/// Keys are only unique within a single document; use one cache per tree and drop it once the
/// tree may change.
#[derive(Debug, Default)]
pub struct CachedResolver {
    inner: BBoxResolver,
    cache: RefCell<FxHashMap<usize, BBox>>,
}

impl CachedResolver {
    pub fn new(inner: BBoxResolver) -> Self {
        Self {
            inner,
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl<E: ElementView> BoxResolver<E> for CachedResolver {
    fn resolve(&self, element: &E) -> BBox {
        let Some(key) = element.node_key() else {
            return self.inner.resolve_via(element, self);
        };
        if let Some(b) = self.cache.borrow().get(&key) {
            return *b;
        }
        let b = self.inner.resolve_via(element, self);
        self.cache.borrow_mut().insert(key, b);
        b
    }
}

/// Classifies with the default calibration.
pub fn classify<E: ElementView>(element: &E) -> ElementKind {
    BBoxResolver::default().classify(element)
}

/// Local (pre-transform) box with the default calibration.
pub fn local_box<E: ElementView>(element: &E) -> BBox {
    BBoxResolver::default().local_box(element)
}

/// Box of `element` in its parent's coordinate space, with the default calibration.
pub fn resolve_box<E: ElementView>(element: &E) -> BBox {
    BBoxResolver::default().resolve(element)
}
