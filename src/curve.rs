//! Bezier curves and their resolution adaptive sampling

use crate::{EPSILON, Scalar, Vector};
use std::fmt;

/// Parametric step corresponding to one world unit of chord at resolution `1.0`
pub const BASE_STEP: Scalar = 1.0;

/// Set of operations common to all bezier curves.
pub trait Curve: Sized {
    /// Point at which curve starts
    fn start(&self) -> Vector;

    /// Point at which curve ends
    fn end(&self) -> Vector;

    /// Evaluate curve at parameter value `t` in (0.0..=1.0)
    fn at(&self, t: Scalar) -> Vector;

    /// Length of the polyline connecting all control points
    fn hull_length(&self) -> Scalar;

    /// Distance between start and end of the curve
    fn chord(&self) -> Scalar {
        self.start().dist(self.end())
    }

    /// Sample curve with density proportional to its size
    ///
    /// See [`CurveSamples`] for the exact sampling rule.
    fn samples(&self, resolution: Scalar) -> CurveSamples<'_, Self> {
        CurveSamples::new(self, resolution)
    }
}

/// Iterator over sampled points of the curve, the last item is always the curve end.
///
/// Parametric step is `BASE_STEP / (chord * resolution)`, samples are taken at
/// `t = k * step` while `t <= 1 - step`. Curves with coinciding ends use
/// length of the control polygon instead of the chord.
pub struct CurveSamples<'a, C> {
    curve: &'a C,
    step: Scalar,
    index: usize,
    done: bool,
}

impl<'a, C: Curve> CurveSamples<'a, C> {
    fn new(curve: &'a C, resolution: Scalar) -> Self {
        let mut size = curve.chord();
        if size < EPSILON {
            size = curve.hull_length();
        }
        let step = BASE_STEP / (size * resolution);
        Self {
            curve,
            // degenerate curves (and NaN) produce only the end point
            step: if step.is_finite() && step > 0.0 {
                step
            } else {
                1.0
            },
            index: 0,
            done: false,
        }
    }

    /// Parametric step between consecutive samples
    pub fn step(&self) -> Scalar {
        self.step
    }
}

impl<C: Curve> Iterator for CurveSamples<'_, C> {
    type Item = Vector;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.index += 1;
        let t = self.index as Scalar * self.step;
        if t <= 1.0 - self.step {
            Some(self.curve.at(t))
        } else {
            self.done = true;
            Some(self.curve.end())
        }
    }
}

/// Quadratic bezier curve
#[derive(Clone, Copy, PartialEq)]
pub struct Quad(pub [Vector; 3]);

impl fmt::Debug for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Quad([p0, p1, p2]) = self;
        write!(f, "Quad {:?} {:?} {:?}", p0, p1, p2)
    }
}

impl Quad {
    pub fn new(p0: impl Into<Vector>, p1: impl Into<Vector>, p2: impl Into<Vector>) -> Self {
        Self([p0.into(), p1.into(), p2.into()])
    }

    /// Points defining quadratic bezier curve
    pub fn points(&self) -> [Vector; 3] {
        self.0
    }

    /// Control point of the smooth continuation of the curve
    pub fn smooth(&self) -> Vector {
        let Quad([_p0, p1, p2]) = self;
        p2.reflect(*p1)
    }
}

impl Curve for Quad {
    fn start(&self) -> Vector {
        self.0[0]
    }

    fn end(&self) -> Vector {
        self.0[2]
    }

    fn at(&self, t: Scalar) -> Vector {
        let Self([p0, p1, p2]) = self;
        let t1 = 1.0 - t;
        (t1 * t1) * *p0 + (2.0 * t1 * t) * *p1 + (t * t) * *p2
    }

    fn hull_length(&self) -> Scalar {
        let Self([p0, p1, p2]) = self;
        p0.dist(*p1) + p1.dist(*p2)
    }
}

/// Cubic bezier curve
#[derive(Clone, Copy, PartialEq)]
pub struct Cubic(pub [Vector; 4]);

impl fmt::Debug for Cubic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Cubic([p0, p1, p2, p3]) = self;
        write!(f, "Cubic {:?} {:?} {:?} {:?}", p0, p1, p2, p3)
    }
}

impl Cubic {
    pub fn new(
        p0: impl Into<Vector>,
        p1: impl Into<Vector>,
        p2: impl Into<Vector>,
        p3: impl Into<Vector>,
    ) -> Self {
        Self([p0.into(), p1.into(), p2.into(), p3.into()])
    }

    /// Points defining cubic bezier curve
    pub fn points(&self) -> [Vector; 4] {
        self.0
    }

    /// Control point of the smooth continuation of the curve
    pub fn smooth(&self) -> Vector {
        let Cubic([_p0, _p1, p2, p3]) = self;
        p3.reflect(*p2)
    }
}

impl Curve for Cubic {
    fn start(&self) -> Vector {
        self.0[0]
    }

    fn end(&self) -> Vector {
        self.0[3]
    }

    fn at(&self, t: Scalar) -> Vector {
        let Self([p0, p1, p2, p3]) = self;
        let t1 = 1.0 - t;
        (t1 * t1 * t1) * *p0
            + (3.0 * t1 * t1 * t) * *p1
            + (3.0 * t1 * t * t) * *p2
            + (t * t * t) * *p3
    }

    fn hull_length(&self) -> Scalar {
        let Self([p0, p1, p2, p3]) = self;
        p0.dist(*p1) + p1.dist(*p2) + p2.dist(*p3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_cubic_at() {
        let cubic = Cubic::new((0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0));
        assert_eq!(cubic.at(0.0), cubic.start());
        assert_eq!(cubic.at(1.0), cubic.end());
        let mid = cubic.at(0.5);
        assert_approx_eq!(mid.x(), 5.0);
        assert_approx_eq!(mid.y(), 7.5);
        assert_eq!(cubic.smooth(), Vector::new(10.0, -10.0));
    }

    #[test]
    fn test_quad_at() {
        let quad = Quad::new((0.0, 0.0), (5.0, 10.0), (10.0, 0.0));
        let mid = quad.at(0.5);
        assert_approx_eq!(mid.x(), 5.0);
        assert_approx_eq!(mid.y(), 5.0);
        assert_eq!(quad.smooth(), Vector::new(15.0, -10.0));
    }

    #[test]
    fn test_samples() {
        // chord of 100 units at resolution 1 gives steps of 0.01
        let quad = Quad::new((0.0, 0.0), (50.0, 0.0), (100.0, 0.0));
        let samples = quad.samples(1.0);
        assert_approx_eq!(samples.step(), 0.01);
        let points: Vec<_> = samples.collect();
        assert_eq!(points.last(), Some(&quad.end()));
        assert!(points.len() >= 99 && points.len() <= 100);
        for pair in points.windows(2) {
            assert!(pair[0].x() < pair[1].x());
        }

        // doubling resolution roughly doubles number of samples
        let dense = quad.samples(2.0).count();
        assert!(dense >= 2 * points.len() - 2);

        // coarse resolution on a short curve only emits the end point
        let short = Quad::new((0.0, 0.0), (0.1, 0.1), (0.2, 0.0));
        let points: Vec<_> = short.samples(1.0).collect();
        assert_eq!(points, vec![short.end()]);
    }

    #[test]
    fn test_samples_closed_loop() {
        // chord is zero, control polygon length is used instead
        let cubic = Cubic::new((0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (0.0, 0.0));
        let points: Vec<_> = cubic.samples(1.0).collect();
        assert!(points.len() > 10);
        assert_eq!(points.last(), Some(&Vector::new(0.0, 0.0)));

        // fully degenerate curve
        let point = Cubic::new((1.0, 1.0), (1.0, 1.0), (1.0, 1.0), (1.0, 1.0));
        assert_eq!(point.samples(1.0).count(), 1);
    }
}
