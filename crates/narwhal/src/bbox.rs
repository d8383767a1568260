use crate::geom::{self, Point, Rect};
use crate::transform::AffineMatrix;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in whatever coordinate space the caller is tracking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for BBox {
    fn default() -> Self {
        Self::DEGENERATE
    }
}

impl BBox {
    /// Returned whenever no finite geometry can be determined.
    pub const DEGENERATE: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding box of the finite points; `None` when there are none.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut it = points.into_iter().filter(|p| geom::is_finite_point(*p));
        let p0 = it.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (p0.x, p0.y, p0.x, p0.y);
        for p in it {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::from_extents(min_x, min_y, max_x, max_y))
    }

    fn from_extents(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x).max(0.0),
            height: (max_y - min_y).max(0.0),
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            geom::point(self.x, self.y),
            geom::point(self.max_x(), self.y),
            geom::point(self.x, self.max_y()),
            geom::point(self.max_x(), self.max_y()),
        ]
    }

    pub fn union(&self, other: &Self) -> Self {
        Self::from_extents(
            self.x.min(other.x),
            self.y.min(other.y),
            self.max_x().max(other.max_x()),
            self.max_y().max(other.max_y()),
        )
    }

    /// Union of every finite box; non-finite boxes are skipped.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a Self>) -> Option<Self> {
        boxes
            .into_iter()
            .filter(|b| b.is_finite())
            .fold(None, |acc: Option<Self>, b| {
                Some(acc.map_or(*b, |a| a.union(b)))
            })
    }

    /// Maps the four corners through `m` and returns their axis-aligned box.
    ///
    /// Non-finite transformed corners are ignored; if none survive the result is
    /// [`BBox::DEGENERATE`].
    pub fn transformed(&self, m: &AffineMatrix) -> Self {
        let t = m.to_transform();
        Self::from_points(self.corners().map(|p| t.transform_point(p))).unwrap_or(Self::DEGENERATE)
    }

    /// Grows the box by `pad` on every side.
    pub fn inflate(&self, pad: f64) -> Self {
        Self::new(
            self.x - pad,
            self.y - pad,
            (self.width + 2.0 * pad).max(0.0),
            (self.height + 2.0 * pad).max(0.0),
        )
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            geom::point(self.x, self.y),
            geom::Size::new(self.width, self.height),
        )
    }
}

impl From<Rect> for BBox {
    fn from(r: Rect) -> Self {
        Self::new(r.origin.x, r.origin.y, r.size.width, r.size.height)
    }
}
