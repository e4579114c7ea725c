use std::{
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
};

pub type Scalar = f64;
pub const EPSILON: f64 = f64::EPSILON;
pub const EPSILON_SQRT: f64 = 1.490_116_119_384_765_6e-8;
pub const PI: f64 = std::f64::consts::PI;

/// Format floats in a compact way suitable for SVG path
pub fn scalar_fmt(f: &mut fmt::Formatter<'_>, value: Scalar) -> fmt::Result {
    let value_abs = value.abs();
    if value_abs.fract() < EPSILON {
        write!(f, "{}", value.trunc() as i64)
    } else if value_abs > 9999.0 || value_abs <= 0.0001 {
        write!(f, "{:.3e}", value)
    } else {
        let ten: Scalar = 10.0;
        let round = ten.powi(6 - (value_abs.trunc() + 1.0).log10().ceil() as i32);
        write!(f, "{}", (value * round).round() / round)
    }
}

/// Value representing a 2D position or direction.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Vector(pub [Scalar; 2]);

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Vector([x, y]) = self;
        scalar_fmt(f, *x)?;
        write!(f, ",")?;
        scalar_fmt(f, *y)?;
        Ok(())
    }
}

impl Vector {
    pub const ZERO: Vector = Vector([0.0, 0.0]);

    #[inline]
    pub const fn new(x: Scalar, y: Scalar) -> Self {
        Self([x, y])
    }

    /// Get `x` component of the vector
    #[inline]
    pub fn x(self) -> Scalar {
        self.0[0]
    }

    /// Get `y` component of the vector
    #[inline]
    pub fn y(self) -> Scalar {
        self.0[1]
    }

    /// Get length of the vector (distance from the origin)
    pub fn length(self) -> Scalar {
        let Self([x, y]) = self;
        x.hypot(y)
    }

    /// Distance between two points
    pub fn dist(self, other: Self) -> Scalar {
        (self - other).length()
    }

    /// Dot product between two vectors
    pub fn dot(self, other: Self) -> Scalar {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        x0 * x1 + y0 * y1
    }

    /// Left perpendicular `(-y, x)` of the vector (not a unit sized)
    pub fn perp(self) -> Vector {
        let Self([x, y]) = self;
        Self([-y, x])
    }

    /// Convert vector to a unit size vector, if length is not zero
    pub fn normalize(self) -> Option<Vector> {
        let Self([x, y]) = self;
        let length = self.length();
        if length < EPSILON {
            None
        } else {
            Some(Self([x / length, y / length]))
        }
    }

    /// Reflect `other` through this point, `self + (self - other)`
    pub fn reflect(self, other: Vector) -> Vector {
        2.0 * self - other
    }

    /// Determine if self is close to the other within the margin of error (EPSILON)
    pub fn is_close_to(self, other: Vector) -> bool {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        (x0 - x1).abs() < EPSILON && (y0 - y1).abs() < EPSILON
    }
}

impl From<(Scalar, Scalar)> for Vector {
    #[inline]
    fn from(xy: (Scalar, Scalar)) -> Self {
        Self([xy.0, xy.1])
    }
}

impl From<Vector> for [Scalar; 2] {
    #[inline]
    fn from(vector: Vector) -> Self {
        vector.0
    }
}

impl Mul<Vector> for Scalar {
    type Output = Vector;

    #[inline]
    fn mul(self, other: Vector) -> Self::Output {
        let Vector([x, y]) = other;
        Vector([self * x, self * y])
    }
}

impl Div<Scalar> for Vector {
    type Output = Vector;

    #[inline]
    fn div(self, rhs: Scalar) -> Self::Output {
        let Vector([x, y]) = self;
        Vector([x / rhs, y / rhs])
    }
}

impl Add for Vector {
    type Output = Vector;

    #[inline]
    fn add(self, other: Vector) -> Self::Output {
        let Vector([x0, y0]) = self;
        let Vector([x1, y1]) = other;
        Vector([x0 + x1, y0 + y1])
    }
}

impl Sub for Vector {
    type Output = Vector;

    #[inline]
    fn sub(self, other: Vector) -> Self::Output {
        let Vector([x0, y0]) = self;
        let Vector([x1, y1]) = other;
        Vector([x0 - x1, y0 - y1])
    }
}

impl Neg for Vector {
    type Output = Vector;

    #[inline]
    fn neg(self) -> Self::Output {
        let Vector([x, y]) = self;
        Vector([-x, -y])
    }
}

/// Traced vertex: position with the unit normal of the segment leading to it.
///
/// The first vertex of a trace has no incoming segment, its normal is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub position: Vector,
    pub normal: Vector,
}

impl Point {
    pub fn new(position: impl Into<Vector>, normal: impl Into<Vector>) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
        }
    }

    /// Apply transformation to both position and normal of the point
    pub fn transform(&self, tr: Transform) -> Self {
        Self {
            position: tr.apply(self.position),
            normal: tr.apply_normal(self.normal),
        }
    }
}

/// 2D affine transformation
///
/// Stored as an array [m00, m01, m02, m10, m11, m12] but semantically corresponds to
/// a matrix:
/// ┌             ┐
/// │ m00 m01 m02 │
/// │ m10 m11 m12 │
/// │   0   0   1 │
/// └             ┘
/// In SVG notation `matrix(a b c d e f)` this is `[a, c, e, b, d, f]`.
#[derive(Clone, Copy, PartialEq)]
pub struct Transform([Scalar; 6]);

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self([m00, m01, m02, m10, m11, m12]) = self;
        write!(f, "matrix(")?;
        for (index, value) in [m00, m10, m01, m11, m02, m12].into_iter().enumerate() {
            if index != 0 {
                write!(f, " ")?;
            }
            scalar_fmt(f, *value)?;
        }
        write!(f, ")")
    }
}

impl Transform {
    /// Create transformation from SVG `matrix(a b c d e f)` components
    pub const fn new(a: Scalar, b: Scalar, c: Scalar, d: Scalar, e: Scalar, f: Scalar) -> Self {
        Self([a, c, e, b, d, f])
    }

    pub const fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
    }

    /// SVG `[a, b, c, d, e, f]` components of the transformation
    pub fn components(&self) -> [Scalar; 6] {
        let Self([m00, m01, m02, m10, m11, m12]) = *self;
        [m00, m10, m01, m11, m02, m12]
    }

    /// Apply this transformation to a point
    pub fn apply(&self, point: Vector) -> Vector {
        let Self([m00, m01, m02, m10, m11, m12]) = self;
        let Vector([x, y]) = point;
        Vector([x * m00 + y * m01 + m02, x * m10 + y * m11 + m12])
    }

    /// Apply only linear part of the transformation, translation is ignored
    pub fn apply_vector(&self, vector: Vector) -> Vector {
        let Self([m00, m01, _, m10, m11, _]) = self;
        let Vector([x, y]) = vector;
        Vector([x * m00 + y * m01, x * m10 + y * m11])
    }

    /// Transform unit normal vector
    ///
    /// Normals are transformed by the inverse transpose of the linear part so
    /// they stay perpendicular to transformed segments under non-uniform scale
    /// or skew. Zero normal stays zero.
    pub fn apply_normal(&self, normal: Vector) -> Vector {
        let Self([m00, m01, _, m10, m11, _]) = self;
        let det = m00 * m11 - m10 * m01;
        let Vector([x, y]) = normal;
        let out = if det.abs() <= EPSILON {
            self.apply_vector(normal)
        } else {
            // transpose(inverse(M)) * n, scaled by det (sign matters)
            Vector([(x * m11 - y * m10) / det, (-x * m01 + y * m00) / det])
        };
        out.normalize().unwrap_or(Vector::ZERO)
    }

    /// Find the inverse transformation
    pub fn invert(&self) -> Option<Self> {
        // inv([[M, v], [0, 1]]) = [[inv(M), - inv(M) * v], [0, 1]]
        let Self([m00, m01, m02, m10, m11, m12]) = self;
        let det = m00 * m11 - m10 * m01;
        if det.abs() <= EPSILON {
            return None;
        }
        let o00 = m11 / det;
        let o01 = -m01 / det;
        let o10 = -m10 / det;
        let o11 = m00 / det;
        let o02 = -o00 * m02 - o01 * m12;
        let o12 = -o10 * m02 - o11 * m12;
        Some(Self([o00, o01, o02, o10, o11, o12]))
    }

    /// Apply translation by `[tx, ty]` before self
    pub fn translate(&self, tx: Scalar, ty: Scalar) -> Self {
        self.matmul(Self([1.0, 0.0, tx, 0.0, 1.0, ty]))
    }

    /// Apply scale transformation by `[sx, sy]` before self
    pub fn scale(&self, sx: Scalar, sy: Scalar) -> Self {
        self.matmul(Self([sx, 0.0, 0.0, 0.0, sy, 0.0]))
    }

    /// Apply rotation by `a` angle (radians) around the origin before self
    pub fn rotate(&self, a: Scalar) -> Self {
        let (sin, cos) = a.sin_cos();
        self.matmul(Self([cos, -sin, 0.0, sin, cos, 0.0]))
    }

    /// Apply rotation around point `p` by angle `a` (radians) before self
    pub fn rotate_around(&self, a: Scalar, p: impl Into<Vector>) -> Self {
        let p = p.into();
        self.translate(p.x(), p.y())
            .rotate(a)
            .translate(-p.x(), -p.y())
    }

    /// Apply skew along `x` axis by angle `a` (radians) before self
    pub fn skew_x(&self, a: Scalar) -> Self {
        self.matmul(Self([1.0, a.tan(), 0.0, 0.0, 1.0, 0.0]))
    }

    /// Apply skew along `y` axis by angle `a` (radians) before self
    pub fn skew_y(&self, a: Scalar) -> Self {
        self.matmul(Self([1.0, 0.0, 0.0, a.tan(), 1.0, 0.0]))
    }

    /// Multiply transformations in matrix form
    ///
    /// Resulting transformation applies `other` first and then `self`.
    pub fn matmul(&self, other: Transform) -> Self {
        let Self([s00, s01, s02, s10, s11, s12]) = self;
        let Self([o00, o01, o02, o10, o11, o12]) = other;

        // s00, s01, s02 | o00, o01, o02
        // s10, s11, s12 | o10, o11, o12
        // 0  , 0  , 1   | 0  , 0  , 1
        Self([
            s00 * o00 + s01 * o10,
            s00 * o01 + s01 * o11,
            s00 * o02 + s01 * o12 + s02,
            s10 * o00 + s11 * o10,
            s10 * o01 + s11 * o11,
            s10 * o02 + s11 * o12 + s12,
        ])
    }
}

impl Mul<Transform> for Transform {
    type Output = Transform;

    fn mul(self, other: Transform) -> Self::Output {
        self.matmul(other)
    }
}

/// Bounding box with sides directed along the axes
#[derive(Clone, Copy, PartialEq)]
pub struct BBox {
    /// Point with minimal x and y values
    min: Vector,
    /// Point with maximum x and y values
    max: Vector,
}

impl Default for BBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BBox {
    /// Construct bounding box which includes points `p0` and `p1`
    pub fn new(p0: impl Into<Vector>, p1: impl Into<Vector>) -> Self {
        let Vector([x0, y0]) = p0.into();
        let Vector([x1, y1]) = p1.into();
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            min: Vector([x0, y0]),
            max: Vector([x1, y1]),
        }
    }

    /// Bounding box that contains nothing, any extension replaces it
    pub const fn empty() -> Self {
        Self {
            min: Vector([Scalar::INFINITY, Scalar::INFINITY]),
            max: Vector([Scalar::NEG_INFINITY, Scalar::NEG_INFINITY]),
        }
    }

    /// Whether no point was added to the bounding box
    pub fn is_empty(&self) -> bool {
        self.min.x() > self.max.x() || self.min.y() > self.max.y()
    }

    /// Point with minimum values of x and y coordinates
    #[inline]
    pub fn min(&self) -> Vector {
        self.min
    }

    /// Point with maximum values of x and y coordinates
    #[inline]
    pub fn max(&self) -> Vector {
        self.max
    }

    /// Width of the bounding box
    #[inline]
    pub fn width(&self) -> Scalar {
        self.max.x() - self.min.x()
    }

    /// Height of the bounding box
    #[inline]
    pub fn height(&self) -> Scalar {
        self.max.y() - self.min.y()
    }

    /// Determine if the point is inside of the bounding box
    pub fn contains(&self, point: Vector) -> bool {
        let Vector([x, y]) = point;
        self.min.x() <= x && x <= self.max.x() && self.min.y() <= y && y <= self.max.y()
    }

    /// Determine if this bounding box lies within `other`, bounds are inclusive
    pub fn is_inside_of(&self, other: &BBox) -> bool {
        self.min.x() >= other.min.x()
            && self.min.y() >= other.min.y()
            && self.max.x() <= other.max.x()
            && self.max.y() <= other.max.y()
    }

    /// Extend bounding box so it would contain provided point
    pub fn extend(&self, point: Vector) -> Self {
        let Vector([x, y]) = point;
        let Vector([x0, y0]) = self.min;
        let Vector([x1, y1]) = self.max;
        Self {
            min: Vector([x0.min(x), y0.min(y)]),
            max: Vector([x1.max(x), y1.max(y)]),
        }
    }

    /// Create bounding box that spans both bboxes
    pub fn union(&self, other: BBox) -> Self {
        if other.is_empty() {
            return *self;
        }
        self.extend(other.min).extend(other.max)
    }
}

impl FromIterator<Vector> for BBox {
    fn from_iter<T: IntoIterator<Item = Vector>>(iter: T) -> Self {
        iter.into_iter()
            .fold(BBox::empty(), |bbox, point| bbox.extend(point))
    }
}

impl fmt::Debug for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "BBox empty");
        }
        write!(f, "BBox x=")?;
        scalar_fmt(f, self.min.x())?;
        write!(f, ", y=")?;
        scalar_fmt(f, self.min.y())?;
        write!(f, ", w=")?;
        scalar_fmt(f, self.width())?;
        write!(f, ", h=")?;
        scalar_fmt(f, self.height())
    }
}
