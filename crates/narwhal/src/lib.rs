#![forbid(unsafe_code)]

//! Headless SVG bounding-box engine.
//!
//! `narwhal` answers `getBBox()` queries for a tree of SVG-like elements without a renderer:
//! boxes are derived from geometric attributes, text length and nested `transform`s only. It is
//! meant to drive diagram layout where no browser is available, so every query returns *a* box
//! and nothing here fails on malformed input.

pub mod bbox;
pub mod config;
pub mod element;
pub mod error;
pub mod geom;
pub mod resolve;
pub mod transform;
pub mod viewport;

pub use bbox::BBox;
pub use config::ResolverConfig;
pub use element::{Element, ElementView};
pub use error::{Error, Result};
pub use resolve::{
    BBoxResolver, BoxResolver, CachedResolver, ElementKind, classify, local_box, resolve_box,
};
pub use transform::{AffineMatrix, TransformOp, parse_transform, parse_transform_ops};
pub use viewport::{Viewport, fit_viewport};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
