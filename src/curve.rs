//! Bezier curves needed by the conversion

use crate::{EPSILON, Point, Scalar, lerp};
use std::fmt;

/// Relative tolerance of the collinearity test in [`Cubic::is_straight`]
const STRAIGHT_EPSILON: Scalar = 16.0 * EPSILON;

/// Set of operations common to all bezier curves.
pub trait Curve: Sized {
    /// Point at which curve starts
    fn start(&self) -> Point;

    /// Point at which curve ends
    fn end(&self) -> Point;

    /// Evaluate curve at parameter value `t` in (0.0..=1.0)
    fn at(&self, t: Scalar) -> Point;

    /// Split the curve at parameter value `0.5`
    fn split(&self) -> (Self, Self);

    /// Identical curve but directed from end to start, instead of start to end.
    fn reverse(&self) -> Self;
}

// -----------------------------------------------------------------------------
// Line
// -----------------------------------------------------------------------------

/// Line segment curve
#[derive(Clone, Copy, PartialEq)]
pub struct Line(pub [Point; 2]);

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Line([p0, p1]) = self;
        write!(f, "Line {:?} {:?}", p0, p1)
    }
}

impl Line {
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self([p0.into(), p1.into()])
    }

    /// Start and end points of the line
    pub fn points(&self) -> [Point; 2] {
        self.0
    }

    /// Direction vector associated with the line segment
    pub fn direction(&self) -> Point {
        self.end() - self.start()
    }

    /// Find intersection point of two lines extended to infinity
    ///
    /// Returned point lies on the `other` line: `other.start() + h * other.direction()`,
    /// where `h` is found by projecting both lines on the normal of `self`. Returns
    /// `None` if lines are parallel (including zero length directions) or the result
    /// is not representable.
    pub fn intersect_lines(&self, other: Line) -> Option<Point> {
        let Line([a, _]) = *self;
        let Line([c, _]) = other;
        let normal = self.direction().normal();
        let cd = other.direction();
        let denom = normal.dot(cd);
        if denom == 0.0 {
            return None;
        }
        let h = normal.dot(a - c) / denom;
        let point = c + h * cd;
        point.is_finite().then_some(point)
    }
}

impl Curve for Line {
    fn start(&self) -> Point {
        self.0[0]
    }

    fn end(&self) -> Point {
        self.0[1]
    }

    fn at(&self, t: Scalar) -> Point {
        let Self([p0, p1]) = *self;
        lerp(p0, p1, t)
    }

    fn split(&self) -> (Self, Self) {
        let Self([p0, p1]) = *self;
        let mid = 0.5 * (p0 + p1);
        (Self([p0, mid]), Self([mid, p1]))
    }

    fn reverse(&self) -> Self {
        let Self([p0, p1]) = *self;
        Self([p1, p0])
    }
}

// -----------------------------------------------------------------------------
// Quadratic bezier curve
// -----------------------------------------------------------------------------

/// Quadratic bezier curve
///
/// Polynimial form:
/// `(1 - t) ^ 2 * p0 + 2 * (1 - t) * t * p1 + t ^ 2 * p2`
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quad(pub [Point; 3]);

impl fmt::Debug for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Quad([p0, p1, p2]) = self;
        write!(f, "Quad {:?} {:?} {:?}", p0, p1, p2)
    }
}

impl Quad {
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>, p2: impl Into<Point>) -> Self {
        Self([p0.into(), p1.into(), p2.into()])
    }

    pub fn points(&self) -> [Point; 3] {
        self.0
    }
}

impl Curve for Quad {
    fn start(&self) -> Point {
        self.0[0]
    }

    fn end(&self) -> Point {
        self.0[2]
    }

    fn at(&self, t: Scalar) -> Point {
        // at(t) =
        //   (1 - t) ^ 2 * p0 +
        //   2 * (1 - t) * t * p1 +
        //   t ^ 2 * p2
        let Self([p0, p1, p2]) = self;
        let (t1, t_1) = (t, 1.0 - t);
        let (t2, t_2) = (t1 * t1, t_1 * t_1);
        t_2 * p0 + 2.0 * t1 * t_1 * p1 + t2 * p2
    }

    fn split(&self) -> (Self, Self) {
        let Self([p0, p1, p2]) = *self;
        let mid = 0.25 * (p0 + 2.0 * p1 + p2);
        (
            Self([p0, 0.5 * (p0 + p1), mid]),
            Self([mid, 0.5 * (p1 + p2), p2]),
        )
    }

    fn reverse(&self) -> Self {
        let Self([p0, p1, p2]) = *self;
        Self([p2, p1, p0])
    }
}

// -----------------------------------------------------------------------------
// Cubic bezier curve
// -----------------------------------------------------------------------------

/// Cubic bezier curve
///
/// Polynimial form:
/// `(1 - t) ^ 3 * p0 + 3 * (1 - t) ^ 2 * t * p1 + 3 * (1 - t) * t ^ 2 * p2 + t ^ 3 * p3`
/// Power basis form (see [`Cubic::parameters`]):
/// `a * t ^ 3 + b * t ^ 2 + c * t + d`
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cubic(pub [Point; 4]);

impl fmt::Debug for Cubic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Cubic([p0, p1, p2, p3]) = self;
        write!(f, "Cubic {:?} {:?} {:?} {:?}", p0, p1, p2, p3)
    }
}

impl Cubic {
    pub fn new(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> Self {
        Self([p0.into(), p1.into(), p2.into(), p3.into()])
    }

    pub fn points(&self) -> [Point; 4] {
        self.0
    }

    /// Coefficients `[a, b, c, d]` of the power basis form `a t^3 + b t^2 + c t + d`
    pub fn parameters(&self) -> [Point; 4] {
        let Self([p0, p1, p2, p3]) = *self;
        let c = 3.0 * (p1 - p0);
        let b = 3.0 * (p2 - p1) - c;
        let d = p0;
        let a = p3 - d - c - b;
        [a, b, c, d]
    }

    /// Construct curve from the power basis coefficients `[a, b, c, d]`
    pub fn from_parameters(params: [Point; 4]) -> Self {
        let [a, b, c, d] = params;
        let p0 = d;
        let p1 = c / 3.0 + d;
        let p2 = (b + c) / 3.0 + p1;
        let p3 = a + d + c + b;
        Self([p0, p1, p2, p3])
    }

    /// Split the curve into three curves at `t = 1/3` and `t = 2/3`
    pub fn split3(&self) -> (Self, Self, Self) {
        const K: Scalar = 1.0 / 27.0;
        let Self([p0, p1, p2, p3]) = *self;
        let mid1 = K * (8.0 * p0 + 12.0 * p1 + 6.0 * p2 + p3);
        let deriv1 = K * (p3 + 3.0 * p2 - 4.0 * p0);
        let mid2 = K * (p0 + 6.0 * p1 + 12.0 * p2 + 8.0 * p3);
        let deriv2 = K * (4.0 * p3 - 3.0 * p1 - p0);
        (
            Self([p0, (2.0 * p0 + p1) / 3.0, mid1 - deriv1, mid1]),
            Self([mid1, mid1 + deriv1, mid2 - deriv2, mid2]),
            Self([mid2, mid2 + deriv2, (p2 + 2.0 * p3) / 3.0, p3]),
        )
    }

    /// Split the curve into `n` curves covering equal parameter intervals
    ///
    /// Consecutive curves share their end points exactly. Panics if `n` is zero.
    pub fn split_into_n(&self, n: usize) -> Vec<Cubic> {
        assert!(n > 0, "curve can not be split into zero parts");
        match n {
            1 => vec![*self],
            2 => {
                let (c0, c1) = self.split();
                vec![c0, c1]
            }
            3 => {
                let (c0, c1, c2) = self.split3();
                vec![c0, c1, c2]
            }
            4 => {
                let (c0, c1) = self.split();
                let (c00, c01) = c0.split();
                let (c10, c11) = c1.split();
                vec![c00, c01, c10, c11]
            }
            6 => {
                let (c0, c1) = self.split();
                let (c00, c01, c02) = c0.split3();
                let (c10, c11, c12) = c1.split3();
                vec![c00, c01, c02, c10, c11, c12]
            }
            _ => self.split_into_n_generic(n),
        }
    }

    /// Split by re-parametrization of the power basis form with `t -> t0 + dt * t`
    fn split_into_n_generic(&self, n: usize) -> Vec<Cubic> {
        let [a, b, c, d] = self.parameters();
        let dt = 1.0 / n as Scalar;
        let dt2 = dt * dt;
        let dt3 = dt * dt2;
        let mut result: Vec<Cubic> = Vec::with_capacity(n);
        for i in 0..n {
            let t0 = i as Scalar * dt;
            let t0_2 = t0 * t0;
            let a1 = dt3 * a;
            let b1 = dt2 * (3.0 * t0 * a + b);
            let c1 = dt * (2.0 * t0 * b + c + 3.0 * t0_2 * a);
            let d1 = (t0 * t0_2) * a + t0_2 * b + t0 * c + d;
            let mut cubic = Cubic::from_parameters([a1, b1, c1, d1]);
            // glue end points together so they are identical and not merely close
            match result.last_mut() {
                None => cubic.0[0] = self.start(),
                Some(prev) => prev.0[3] = cubic.start(),
            }
            result.push(cubic);
        }
        if let Some(last) = result.last_mut() {
            last.0[3] = self.end();
        }
        result
    }

    /// Check if the curve is a straight segment `p0..p3`
    ///
    /// Control points must be collinear with the end points (up to rounding relative
    /// to the size of the curve) and project inside of the segment, so the curve
    /// traces exactly the segment. Curve with coinciding end points is straight only
    /// if all of its points coincide.
    pub fn is_straight(&self) -> bool {
        let Self([p0, p1, p2, p3]) = *self;
        let dir = p3 - p0;
        let length2 = dir.dot(dir);
        if length2 == 0.0 {
            return p1 == p0 && p2 == p0;
        }
        [p1, p2].into_iter().all(|p| {
            let offset = p - p0;
            let proj = dir.dot(offset);
            let cross = dir.cross(offset);
            (0.0..=length2).contains(&proj)
                && cross.abs() <= STRAIGHT_EPSILON * dir.length() * offset.length()
        })
    }
}

impl Curve for Cubic {
    fn start(&self) -> Point {
        self.0[0]
    }

    fn end(&self) -> Point {
        self.0[3]
    }

    fn at(&self, t: Scalar) -> Point {
        // at(t) =
        //   (1 - t) ^ 3 * p0 +
        //   3 * (1 - t) ^ 2 * t * p1 +
        //   3 * (1 - t) * t ^ 2 * p2 +
        //   t ^ 3 * p3
        let Self([p0, p1, p2, p3]) = self;
        let (t1, t_1) = (t, 1.0 - t);
        let (t2, t_2) = (t1 * t1, t_1 * t_1);
        let (t3, t_3) = (t2 * t1, t_2 * t_1);
        t_3 * p0 + 3.0 * t1 * t_2 * p1 + 3.0 * t2 * t_1 * p2 + t3 * p3
    }

    /// Exact split at `t = 0.5` expressed through the mid point and the derivative at it
    fn split(&self) -> (Self, Self) {
        let Self([p0, p1, p2, p3]) = *self;
        let mid = 0.125 * (p0 + 3.0 * (p1 + p2) + p3);
        let deriv3 = 0.125 * (p3 + p2 - p1 - p0);
        (
            Self([p0, 0.5 * (p0 + p1), mid - deriv3, mid]),
            Self([mid, mid + deriv3, 0.5 * (p2 + p3), p3]),
        )
    }

    fn reverse(&self) -> Self {
        let Self([p0, p1, p2, p3]) = *self;
        Self([p3, p2, p1, p0])
    }
}

impl From<Quad> for Cubic {
    /// Exact degree elevation of the quadratic curve
    fn from(quad: Quad) -> Self {
        let Quad([p0, p1, p2]) = quad;
        Self([p0, p0 + (2.0 / 3.0) * (p1 - p0), p2 + (2.0 / 3.0) * (p1 - p2), p2])
    }
}

impl<P: Into<Point>> From<[P; 4]> for Cubic {
    fn from(points: [P; 4]) -> Self {
        let [p0, p1, p2, p3] = points;
        Self::new(p0, p1, p2, p3)
    }
}
