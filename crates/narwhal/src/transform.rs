//! SVG `transform` attribute parsing and affine composition.
//!
//! Supported operations are `translate`, `scale`, `matrix` and `rotate` (with optional pivot).
//! Anything else in the list is skipped, and malformed input degrades toward identity instead of
//! failing: layout callers need *a* matrix for every element.

use crate::geom::{self, Point, Transform};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 2D affine matrix in the same form as `matrix(a b c d e f)`:
///
/// ```text
/// [a c e]
/// [b d f]
/// [0 0 1]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineMatrix {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Pure rotation about the origin; `angle_deg` is in degrees.
    pub fn rotate(angle_deg: f64) -> Self {
        let rad = angle_deg.to_radians();
        let (sin, cos) = rad.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation about `(cx, cy)`: `translate(cx,cy) · rotate(angle) · translate(-cx,-cy)`.
    pub fn rotate_about(angle_deg: f64, cx: f64, cy: f64) -> Self {
        Self::translate(cx, cy)
            .then_apply(Self::rotate(angle_deg))
            .then_apply(Self::translate(-cx, -cy))
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }

    pub fn to_transform(self) -> Transform {
        Transform::new(self.a, self.b, self.c, self.d, self.e, self.f)
    }

    /// Right-composes `inner` onto `self` (`self ∘ inner`).
    ///
    /// The result maps a point through `inner` first and `self` second, which is how a
    /// transform list reads left to right: the first-written operation is the outermost one.
    pub fn then_apply(self, inner: Self) -> Self {
        inner.to_transform().then(&self.to_transform()).into()
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let p = self.apply_point(geom::point(x, y));
        (p.x, p.y)
    }

    pub fn apply_point(&self, p: Point) -> Point {
        self.to_transform().transform_point(p)
    }
}

impl From<Transform> for AffineMatrix {
    fn from(t: Transform) -> Self {
        Self::new(t.m11, t.m12, t.m21, t.m22, t.m31, t.m32)
    }
}

impl From<AffineMatrix> for Transform {
    fn from(m: AffineMatrix) -> Self {
        m.to_transform()
    }
}

/// One `name(args...)` entry of a transform list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum TransformOp {
    Translate {
        tx: f64,
        ty: f64,
    },
    Scale {
        sx: f64,
        sy: f64,
    },
    Matrix(AffineMatrix),
    Rotate {
        angle_deg: f64,
        cx: Option<f64>,
        cy: Option<f64>,
    },
}

impl TransformOp {
    /// Builds an op from a lowercase name and its surviving numeric arguments.
    ///
    /// Returns `None` when the name is unknown or the arguments are insufficient
    /// (`matrix` needs six, `rotate` needs one).
    pub fn from_parts(name: &str, args: &[f64]) -> Option<Self> {
        match name {
            "translate" => Some(Self::Translate {
                tx: args.first().copied().unwrap_or(0.0),
                ty: args.get(1).copied().unwrap_or(0.0),
            }),
            "scale" => {
                let sx = args.first().copied().unwrap_or(1.0);
                let sy = args.get(1).copied().unwrap_or(sx);
                Some(Self::Scale { sx, sy })
            }
            "matrix" if args.len() >= 6 => Some(Self::Matrix(AffineMatrix::new(
                args[0], args[1], args[2], args[3], args[4], args[5],
            ))),
            "rotate" if !args.is_empty() => Some(Self::Rotate {
                angle_deg: args[0],
                cx: args.get(1).copied(),
                cy: args.get(2).copied(),
            }),
            _ => None,
        }
    }

    pub fn to_matrix(&self) -> AffineMatrix {
        match *self {
            Self::Translate { tx, ty } => AffineMatrix::translate(tx, ty),
            Self::Scale { sx, sy } => AffineMatrix::scale(sx, sy),
            Self::Matrix(m) => m,
            Self::Rotate { angle_deg, cx, cy } => {
                AffineMatrix::rotate_about(angle_deg, cx.unwrap_or(0.0), cy.unwrap_or(0.0))
            }
        }
    }
}

fn re_transform_op() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"([a-zA-Z]+)\(([^)]*)\)").expect("valid transform regex"))
}

fn parse_args(raw: &str) -> Vec<f64> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(geom::parse_number)
        .collect()
}

/// Tokenizes a transform list into recognized operations, in source order.
pub fn parse_transform_ops(raw: Option<&str>) -> Vec<TransformOp> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    let mut ops = Vec::new();
    for caps in re_transform_op().captures_iter(raw) {
        let name = caps
            .get(1)
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();
        let args = parse_args(caps.get(2).map(|m| m.as_str()).unwrap_or_default());
        match TransformOp::from_parts(&name, &args) {
            Some(op) => ops.push(op),
            None => tracing::debug!(op = %name, ?args, "skipping transform op"),
        }
    }
    ops
}

/// Parses a `transform` attribute value into a single matrix.
///
/// Empty, absent or entirely unrecognized input yields [`AffineMatrix::IDENTITY`]. The result
/// always holds six finite numbers; a composition that overflows collapses to identity.
pub fn parse_transform(raw: Option<&str>) -> AffineMatrix {
    let m = parse_transform_ops(raw)
        .iter()
        .fold(AffineMatrix::IDENTITY, |running, op| {
            running.then_apply(op.to_matrix())
        });
    if m.is_finite() {
        m
    } else {
        tracing::debug!(transform = ?raw, "non-finite transform; using identity");
        AffineMatrix::IDENTITY
    }
}
