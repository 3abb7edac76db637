//! Quadratic splines produced by the conversion
use crate::{Cubic, Curve, Error, Point, Quad, Scalar};
use std::{collections::BTreeMap, fmt};

/// Quadratic spline approximating a single cubic curve
///
/// Stored as a flat list of `n + 2` points for `n` segments. First and last points
/// are on-curve points which are identical to the end points of the cubic, all
/// points in between are off-curve control points. On-curve points joining two
/// segments are implied, they lie in the middle between consecutive control
/// points (TrueType convention).
#[derive(Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Point>")
)]
pub struct Spline(Vec<Point>);

impl fmt::Debug for Spline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Spline")?;
        for point in self.0.iter() {
            write!(f, " {:?}", point)?;
        }
        Ok(())
    }
}

impl Spline {
    /// Create spline from the list of points, returns `None` if there are less than three
    pub fn new(points: Vec<Point>) -> Option<Self> {
        (points.len() >= 3).then_some(Self(points))
    }

    /// All points of the spline, on-curve end points included
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Points of the spline as coordinate pairs
    pub fn coords(&self) -> &[[Scalar; 2]] {
        bytemuck::cast_slice(&self.0)
    }

    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    /// Number of quadratic segments
    pub fn segments_count(&self) -> usize {
        self.0.len() - 2
    }

    pub fn start(&self) -> Point {
        self.0[0]
    }

    pub fn end(&self) -> Point {
        self.0[self.0.len() - 1]
    }

    /// Iterator over quadratic segments with implied on-curve points made explicit
    pub fn quads(&self) -> impl Iterator<Item = Quad> + '_ {
        let last = self.0.len() - 2;
        (1..=last).map(move |i| {
            let p0 = if i == 1 {
                self.0[0]
            } else {
                0.5 * (self.0[i - 1] + self.0[i])
            };
            let p2 = if i == last {
                self.0[i + 1]
            } else {
                0.5 * (self.0[i] + self.0[i + 1])
            };
            Quad([p0, self.0[i], p2])
        })
    }

    /// Same spline directed from end to start
    pub fn reverse(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }

    /// Maximum distance between the cubic and the spline at sampled parameter values
    ///
    /// Each segment is assumed to cover an equal parameter interval of the cubic
    /// and is sampled `steps` times. This is only an estimate of the real error,
    /// it is used for diagnostics.
    pub fn max_sampled_error(&self, cubic: Cubic, steps: usize) -> Scalar {
        let n = self.segments_count() as Scalar;
        let steps = steps.max(1);
        let mut error: Scalar = 0.0;
        for (i, quad) in self.quads().enumerate() {
            for j in 0..=steps {
                let t = j as Scalar / steps as Scalar;
                let dist = cubic.at((i as Scalar + t) / n).dist(quad.at(t));
                error = error.max(dist);
            }
        }
        error
    }
}

impl TryFrom<Vec<Point>> for Spline {
    type Error = Error;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        let count = points.len();
        Self::new(points).ok_or_else(|| Error::InvalidArgument {
            reason: format!("spline requires at least three points, {} given", count),
        })
    }
}

/// Statistics of produced splines, number of splines per segments count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplineStats(BTreeMap<usize, usize>);

impl SplineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a single converted spline
    pub fn record(&mut self, spline: &Spline) {
        *self.0.entry(spline.segments_count()).or_default() += 1;
    }

    /// Account for a batch of compatible splines, counted once
    pub fn record_batch(&mut self, splines: &[Spline]) {
        if let Some(spline) = splines.first() {
            self.record(spline);
        }
    }

    /// Number of splines with `segments` segments
    pub fn get(&self, segments: usize) -> usize {
        self.0.get(&segments).copied().unwrap_or(0)
    }

    /// Total number of recorded splines
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Iterate over `(segments_count, splines_count)` pairs ordered by segments count
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(segments, count)| (*segments, *count))
    }
}

impl fmt::Display for SplineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "New spline lengths:")?;
        for (segments, count) in self.iter() {
            writeln!(f, "{}: {}", segments, count)?;
        }
        Ok(())
    }
}
