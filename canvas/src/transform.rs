use crate::error::*;
use crate::geometry::*;

use flo_curves::geo::*;

use std::ops::{Mul};

///
/// The order in which a transform is combined with another
///
/// Points are row vectors multiplied on the left of the matrix (`v' = v·A`), so `Append` means the new
/// matrix is applied after the existing one, and `Prepend` means it is applied first, in the local
/// space of whatever is being drawn.
///
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum MatrixOrder {
    /// The new transformation happens after the existing one
    Append,

    /// The new transformation happens before the existing one
    Prepend,
}

///
/// Classification of a transform, used to choose fast paths when combining and applying it
///
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransformKind {
    /// The transform leaves every point where it is
    Identity,

    /// The transform only moves points
    Translation,

    /// The transform only scales points about the origin
    Scaling,

    /// The transform scales about the origin and then moves points
    TranslationScaling,

    /// Rotation, skew or some other general transformation
    Unknown,
}

///
/// A 2D affine transformation matrix
///
/// ```text
/// | m11 m12 0 |
/// | m21 m22 0 |
/// | dx  dy  1 |
/// ```
///
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(from = "[f64; 6]", into = "[f64; 6]")]
pub struct AffineTransform {
    m11:        f64,
    m12:        f64,
    m21:        f64,
    m22:        f64,
    offset_x:   f64,
    offset_y:   f64,

    /// Always derived from the coefficients above
    kind:       TransformKind,
}

impl TransformKind {
    ///
    /// Works out the kind of a transform from its coefficients
    ///
    fn classify(m11: f64, m12: f64, m21: f64, m22: f64, offset_x: f64, offset_y: f64) -> TransformKind {
        if m12 != 0.0 || m21 != 0.0 {
            TransformKind::Unknown
        } else {
            let scaled      = m11 != 1.0 || m22 != 1.0;
            let translated  = offset_x != 0.0 || offset_y != 0.0;

            match (scaled, translated) {
                (false, false)  => TransformKind::Identity,
                (false, true)   => TransformKind::Translation,
                (true, false)   => TransformKind::Scaling,
                (true, true)    => TransformKind::TranslationScaling,
            }
        }
    }
}

impl AffineTransform {
    ///
    /// Creates a transform from its coefficients
    ///
    pub fn new(m11: f64, m12: f64, m21: f64, m22: f64, offset_x: f64, offset_y: f64) -> AffineTransform {
        AffineTransform {
            m11, m12, m21, m22, offset_x, offset_y,
            kind: TransformKind::classify(m11, m12, m21, m22, offset_x, offset_y)
        }
    }

    ///
    /// The identity transform
    ///
    pub const fn identity() -> AffineTransform {
        AffineTransform {
            m11: 1.0, m12: 0.0,
            m21: 0.0, m22: 1.0,
            offset_x: 0.0, offset_y: 0.0,
            kind: TransformKind::Identity
        }
    }

    ///
    /// A transform that moves points by the specified offset
    ///
    pub fn translation(dx: f64, dy: f64) -> AffineTransform {
        AffineTransform::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    ///
    /// A transform that scales about the origin
    ///
    pub fn scaling(sx: f64, sy: f64) -> AffineTransform {
        AffineTransform::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    ///
    /// A transform that scales about a particular center point
    ///
    pub fn scaling_at(sx: f64, sy: f64, center: Point) -> AffineTransform {
        Self::about_point(AffineTransform::scaling(sx, sy), center)
    }

    ///
    /// A transform that rotates by an angle in degrees about the origin
    ///
    /// With a downward-pointing y axis, positive angles rotate clockwise on the page.
    ///
    pub fn rotation(degrees: f64) -> AffineTransform {
        let radians = degrees.to_radians();
        let (s, c)  = snapped_sin_cos(radians);

        AffineTransform::new(c, s, -s, c, 0.0, 0.0)
    }

    ///
    /// A transform that rotates by an angle in degrees about a particular center point
    ///
    pub fn rotation_at(degrees: f64, center: Point) -> AffineTransform {
        Self::about_point(AffineTransform::rotation(degrees), center)
    }

    ///
    /// A transform that skews by the specified angles (in degrees) along the x and y axes
    ///
    pub fn skewing(x_degrees: f64, y_degrees: f64) -> AffineTransform {
        let skew_x = x_degrees.to_radians().tan();
        let skew_y = y_degrees.to_radians().tan();

        AffineTransform::new(1.0, skew_y, skew_x, 1.0, 0.0, 0.0)
    }

    ///
    /// Performs an operation about a point: moves the point to the origin, applies the transform and moves it back
    ///
    fn about_point(transform: AffineTransform, center: Point) -> AffineTransform {
        let to_origin   = AffineTransform::translation(-center.x(), -center.y());
        let from_origin = AffineTransform::translation(center.x(), center.y());

        Self::multiply(&Self::multiply(&to_origin, &transform, MatrixOrder::Append), &from_origin, MatrixOrder::Append)
    }

    #[inline] pub fn m11(&self) -> f64                  { self.m11 }
    #[inline] pub fn m12(&self) -> f64                  { self.m12 }
    #[inline] pub fn m21(&self) -> f64                  { self.m21 }
    #[inline] pub fn m22(&self) -> f64                  { self.m22 }
    #[inline] pub fn offset_x(&self) -> f64             { self.offset_x }
    #[inline] pub fn offset_y(&self) -> f64             { self.offset_y }
    #[inline] pub fn kind(&self) -> TransformKind       { self.kind }
    #[inline] pub fn is_identity(&self) -> bool         { self.kind == TransformKind::Identity }

    ///
    /// The six coefficients of this transform, in the order m11, m12, m21, m22, offset_x, offset_y
    ///
    pub fn elements(&self) -> [f64; 6] {
        [self.m11, self.m12, self.m21, self.m22, self.offset_x, self.offset_y]
    }

    ///
    /// Combines two transforms
    ///
    /// With `Append`, the result applies `a` and then `b`. With `Prepend` the result applies `b` and then `a`.
    ///
    pub fn multiply(a: &AffineTransform, b: &AffineTransform, order: MatrixOrder) -> AffineTransform {
        use self::TransformKind::*;

        let (first, second) = match order {
            MatrixOrder::Append     => (a, b),
            MatrixOrder::Prepend    => (b, a),
        };

        match (first.kind, second.kind) {
            (Identity, _)               => *second,
            (_, Identity)               => *first,

            (Translation, Translation)  => AffineTransform::translation(first.offset_x + second.offset_x, first.offset_y + second.offset_y),
            (Scaling, Scaling)          => AffineTransform::scaling(first.m11 * second.m11, first.m22 * second.m22),

            _                           => {
                AffineTransform::new(
                    first.m11 * second.m11 + first.m12 * second.m21,
                    first.m11 * second.m12 + first.m12 * second.m22,
                    first.m21 * second.m11 + first.m22 * second.m21,
                    first.m21 * second.m12 + first.m22 * second.m22,
                    first.offset_x * second.m11 + first.offset_y * second.m21 + second.offset_x,
                    first.offset_x * second.m12 + first.offset_y * second.m22 + second.offset_y
                )
            }
        }
    }

    ///
    /// Combines another transform into this one
    ///
    pub fn multiply_by(&mut self, transform: &AffineTransform, order: MatrixOrder) {
        *self = Self::multiply(self, transform, order);
    }

    /// Applies `transform` after this one
    pub fn append(&mut self, transform: &AffineTransform) {
        self.multiply_by(transform, MatrixOrder::Append);
    }

    /// Applies `transform` before this one
    pub fn prepend(&mut self, transform: &AffineTransform) {
        self.multiply_by(transform, MatrixOrder::Prepend);
    }

    pub fn translate(&mut self, dx: f64, dy: f64, order: MatrixOrder) {
        self.multiply_by(&AffineTransform::translation(dx, dy), order);
    }

    pub fn scale(&mut self, sx: f64, sy: f64, order: MatrixOrder) {
        self.multiply_by(&AffineTransform::scaling(sx, sy), order);
    }

    pub fn scale_at(&mut self, sx: f64, sy: f64, center: Point, order: MatrixOrder) {
        self.multiply_by(&AffineTransform::scaling_at(sx, sy, center), order);
    }

    pub fn rotate(&mut self, degrees: f64, order: MatrixOrder) {
        self.multiply_by(&AffineTransform::rotation(degrees), order);
    }

    pub fn rotate_at(&mut self, degrees: f64, center: Point, order: MatrixOrder) {
        self.multiply_by(&AffineTransform::rotation_at(degrees, center), order);
    }

    pub fn skew(&mut self, x_degrees: f64, y_degrees: f64, order: MatrixOrder) {
        self.multiply_by(&AffineTransform::skewing(x_degrees, y_degrees), order);
    }

    ///
    /// The determinant of the linear part of this transform
    ///
    pub fn determinant(&self) -> f64 {
        match self.kind {
            TransformKind::Identity | TransformKind::Translation            => 1.0,
            TransformKind::Scaling | TransformKind::TranslationScaling      => self.m11 * self.m22,
            TransformKind::Unknown                                          => self.m11 * self.m22 - self.m12 * self.m21,
        }
    }

    ///
    /// True if the determinant is large enough (relative to the size of the coefficients) for this to be inverted
    ///
    pub fn is_invertible(&self) -> bool {
        let scale = self.m11.abs().max(self.m12.abs()).max(self.m21.abs()).max(self.m22.abs());

        if scale == 0.0 || !scale.is_finite() {
            false
        } else {
            self.determinant().abs() >= 1e-10 * scale * scale
        }
    }

    ///
    /// Returns the inverse of this transform
    ///
    pub fn inverted(&self) -> CanvasResult<AffineTransform> {
        if !self.is_invertible() {
            return Err(CanvasError::NotInvertible);
        }

        let inverse = match self.kind {
            TransformKind::Identity             => *self,
            TransformKind::Translation          => AffineTransform::translation(-self.offset_x, -self.offset_y),

            TransformKind::Scaling              => AffineTransform::scaling(1.0/self.m11, 1.0/self.m22),
            TransformKind::TranslationScaling   => {
                let sx = 1.0/self.m11;
                let sy = 1.0/self.m22;
                AffineTransform::new(sx, 0.0, 0.0, sy, -self.offset_x * sx, -self.offset_y * sy)
            }

            TransformKind::Unknown              => {
                let det = self.determinant();

                AffineTransform::new(
                    self.m22 / det,
                    -self.m12 / det,
                    -self.m21 / det,
                    self.m11 / det,
                    (self.m21 * self.offset_y - self.m22 * self.offset_x) / det,
                    (self.m12 * self.offset_x - self.m11 * self.offset_y) / det
                )
            }
        };

        Ok(inverse)
    }

    ///
    /// Inverts this transform in place (leaving it unchanged if it can't be inverted)
    ///
    pub fn invert(&mut self) -> CanvasResult<()> {
        *self = self.inverted()?;
        Ok(())
    }

    ///
    /// Transforms a point
    ///
    #[inline]
    pub fn transform_point(&self, point: Point) -> Point {
        let (x, y) = (point.x(), point.y());

        match self.kind {
            TransformKind::Identity             => point,
            TransformKind::Translation          => Coord2(x + self.offset_x, y + self.offset_y),
            TransformKind::Scaling              => Coord2(x * self.m11, y * self.m22),
            TransformKind::TranslationScaling   => Coord2(x * self.m11 + self.offset_x, y * self.m22 + self.offset_y),
            TransformKind::Unknown              => Coord2(
                x * self.m11 + y * self.m21 + self.offset_x,
                x * self.m12 + y * self.m22 + self.offset_y
            ),
        }
    }

    ///
    /// Transforms a vector (ignoring the translation part of this transform)
    ///
    #[inline]
    pub fn transform_vector(&self, vector: Point) -> Point {
        let (x, y) = (vector.x(), vector.y());

        match self.kind {
            TransformKind::Identity | TransformKind::Translation        => vector,
            TransformKind::Scaling | TransformKind::TranslationScaling  => Coord2(x * self.m11, y * self.m22),
            TransformKind::Unknown                                      => Coord2(x * self.m11 + y * self.m21, x * self.m12 + y * self.m22),
        }
    }

    ///
    /// Transforms a set of points in place
    ///
    pub fn transform_points(&self, points: &mut [Point]) {
        if self.kind != TransformKind::Identity {
            points.iter_mut().for_each(|point| *point = self.transform_point(*point));
        }
    }

    ///
    /// Transforms a set of vectors in place
    ///
    pub fn transform_vectors(&self, vectors: &mut [Point]) {
        vectors.iter_mut().for_each(|vector| *vector = self.transform_vector(*vector));
    }
}

impl Default for AffineTransform {
    fn default() -> AffineTransform {
        AffineTransform::identity()
    }
}

impl PartialEq for AffineTransform {
    fn eq(&self, other: &AffineTransform) -> bool {
        self.elements() == other.elements()
    }
}

impl From<[f64; 6]> for AffineTransform {
    fn from(elements: [f64; 6]) -> AffineTransform {
        let [m11, m12, m21, m22, offset_x, offset_y] = elements;
        AffineTransform::new(m11, m12, m21, m22, offset_x, offset_y)
    }
}

impl From<AffineTransform> for [f64; 6] {
    fn from(transform: AffineTransform) -> [f64; 6] {
        transform.elements()
    }
}

impl Mul<AffineTransform> for AffineTransform {
    type Output = AffineTransform;

    ///
    /// `a * b` applies `a` and then `b`
    ///
    fn mul(self, other: AffineTransform) -> AffineTransform {
        AffineTransform::multiply(&self, &other, MatrixOrder::Append)
    }
}
