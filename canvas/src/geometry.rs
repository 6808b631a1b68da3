use crate::error::*;

use flo_curves::geo::*;

///
/// A point on the page (or a vector between two points)
///
pub type Point = Coord2;

///
/// Size of something in page units
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Size {
    pub width:  f64,
    pub height: f64,
}

///
/// An axis-aligned rectangle, described by its top-left corner and its size
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Rect {
    pub x:      f64,
    pub y:      f64,
    pub width:  f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Size {
        Size { width, height }
    }
}

impl Rect {
    ///
    /// Creates a new rectangle from its top-left position and its size
    ///
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect { x, y, width, height }
    }

    ///
    /// Creates the rectangle that has two points as opposite corners
    ///
    pub fn from_points(p1: Point, p2: Point) -> Rect {
        let min_x = p1.x().min(p2.x());
        let min_y = p1.y().min(p2.y());
        let max_x = p1.x().max(p2.x());
        let max_y = p1.y().max(p2.y());

        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    #[inline] pub fn left(&self) -> f64     { self.x }
    #[inline] pub fn top(&self) -> f64      { self.y }
    #[inline] pub fn right(&self) -> f64    { self.x + self.width }
    #[inline] pub fn bottom(&self) -> f64   { self.y + self.height }
    #[inline] pub fn location(&self) -> Point { Coord2(self.x, self.y) }
    #[inline] pub fn size(&self) -> Size    { Size::new(self.width, self.height) }

    ///
    /// The point at the center of this rectangle
    ///
    pub fn center(&self) -> Point {
        Coord2(self.x + self.width/2.0, self.y + self.height/2.0)
    }

    ///
    /// True if this rectangle has no area
    ///
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    ///
    /// Extends this rectangle so that it includes the specified point
    ///
    pub fn union_point(&self, point: Point) -> Rect {
        let min_x = self.left().min(point.x());
        let min_y = self.top().min(point.y());
        let max_x = self.right().max(point.x());
        let max_y = self.bottom().max(point.y());

        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    ///
    /// Fails if any coordinate in this rectangle is not finite
    ///
    pub (crate) fn check_finite(&self, what: &str) -> CanvasResult<()> {
        check_finite(what, &[self.x, self.y, self.width, self.height])
    }
}

///
/// Fails if any of the points in a list has a non-finite coordinate
///
pub (crate) fn check_points(what: &str, points: &[Point]) -> CanvasResult<()> {
    for point in points.iter() {
        check_finite(what, &[point.x(), point.y()])?;
    }

    Ok(())
}

///
/// True if two points are within a small distance of each other
///
#[inline]
pub (crate) fn points_close(p1: Point, p2: Point) -> bool {
    const EPSILON: f64 = 1e-9;

    (p1.x() - p2.x()).abs() <= EPSILON && (p1.y() - p2.y()).abs() <= EPSILON
}

///
/// Sine and cosine of an angle, with values very close to 0 or 1 snapped so that multiples of 90 degrees are exact
///
pub (crate) fn snapped_sin_cos(radians: f64) -> (f64, f64) {
    let (s, c)  = radians.sin_cos();
    let snap    = |val: f64| {
        if val.abs() < 1e-15 { 0.0 }
        else if (val.abs() - 1.0).abs() < 1e-15 { val.signum() }
        else { val }
    };

    (snap(s), snap(c))
}
