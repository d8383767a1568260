#![forbid(unsafe_code)]

//! SVG document adapter for `narwhal`.
//!
//! Parses markup with `roxmltree` and exposes elements as [`narwhal::ElementView`], so rendered
//! Mermaid output (or any other SVG) can be queried for boxes and re-fitted headlessly.

pub mod document;
pub mod error;
pub mod rewrite;

pub use document::{SvgDocument, SvgNode};
pub use error::{Error, Result};
pub use rewrite::{apply_viewport, fit_svg};
