//! Conversion of cubic bezier curves to quadratic splines
//!
//! For a given number of segments `n` the cubic is split into `n` equal parameter
//! pieces and every piece is replaced by a quadratic whose control point is chosen
//! from the tangents of the piece. Joints between quadratics are implied on-curve
//! points in the middle of neighbouring control points, so the approximation is
//! described only by its control points. The smallest `n` for which every piece
//! stays within tolerance of the cubic wins.
use crate::{Cubic, Curve, Line, Point, Quad, Scalar, Spline, cubic_fit_inside};
use std::fmt;

/// Default maximum number of quadratic segments used to approximate a single cubic
pub const MAX_N: usize = 100;

/// Default tolerance relative to the em size used by font converters
pub const DEFAULT_MAX_ERR_EM: Scalar = 0.001;

/// Absolute tolerance corresponding to `max_err_em` fraction of the em size
pub fn max_err_for_upem(units_per_em: Scalar, max_err_em: Scalar) -> Scalar {
    units_per_em * max_err_em
}

/// Options controlling the search for an approximation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConvertOptions {
    /// Maximum number of quadratic segments per cubic before search is abandoned
    pub max_n: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { max_n: MAX_N }
    }
}

impl ConvertOptions {
    pub fn with_max_n(self, max_n: usize) -> Self {
        Self { max_n }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.max_n == 0 {
            return Err(Error::InvalidArgument {
                reason: "max_n must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Errors reported by the conversion
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// No spline with at most `max_n` segments fits within tolerance. Contains the
    /// curve for the single curve conversion, or all curves of the batch.
    ApproxNotFound { curves: Vec<Cubic> },
    /// Arguments violate preconditions of the conversion
    InvalidArgument { reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ApproxNotFound { curves } => {
                write!(f, "no approximation found: {:?}", curves)
            }
            Error::InvalidArgument { reason } => write!(f, "invalid argument: {}", reason),
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        Self::new(std::io::ErrorKind::InvalidData, error)
    }
}

impl std::error::Error for Error {}

fn validate_tolerance(max_err: Scalar) -> Result<(), Error> {
    if max_err.is_nan() || max_err < 0.0 {
        return Err(Error::InvalidArgument {
            reason: format!("tolerance must be a non-negative number: {}", max_err),
        });
    }
    Ok(())
}

/// Control points of a cubic which is a degree elevation of the quad `(q0, q1, q2)`
#[inline]
fn elevate(q0: Point, q1: Point, q2: Point) -> (Point, Point) {
    (q0 + (2.0 / 3.0) * (q1 - q0), q2 + (2.0 / 3.0) * (q1 - q2))
}

/// Candidate control point of a quadratic approximating the cubic piece
///
/// Blends between the control point matching the start tangent (`t = 0`) and the
/// one matching the end tangent (`t = 1`).
fn cubic_approx_control(cubic: Cubic, t: Scalar) -> Point {
    let Cubic([p0, p1, p2, p3]) = cubic;
    let start = p0 + 1.5 * (p1 - p0);
    let end = p3 + 1.5 * (p2 - p3);
    start + t * (end - start)
}

/// Single quadratic sharing both end tangents with the cubic, if it is within tolerance
///
/// The control point is the intersection of the tangent rays. Parallel rays have
/// no intersection, such cubic is approximated only if it is a straight segment,
/// in which case the quadratic traces exactly the same segment.
pub fn cubic_approx_quadratic(cubic: Cubic, tolerance: Scalar) -> Option<Quad> {
    let Cubic([p0, p1, p2, p3]) = cubic;
    if cubic.is_straight() {
        return Some(Quad([p0, 0.5 * (p0 + p3), p3]));
    }
    let q1 = Line::new(p0, p1).intersect_lines(Line::new(p3, p2))?;
    let (c1, c2) = elevate(p0, q1, p3);
    let zero = Point::new(0.0, 0.0);
    cubic_fit_inside(Cubic([zero, c1 - p1, c2 - p2, zero]), tolerance)
        .then_some(Quad([p0, q1, p3]))
}

/// Approximate the cubic with a spline of exactly `n` quadratic segments
///
/// Returns `None` if the spline does not fit within `tolerance`. Pieces are checked
/// as soon as their control points are known, so the search bails out early.
pub fn cubic_approx_spline(cubic: Cubic, n: usize, tolerance: Scalar) -> Option<Spline> {
    if n == 1 {
        let quad = cubic_approx_quadratic(cubic, tolerance)?;
        return Spline::new(quad.points().to_vec());
    }

    let cubics = cubic.split_into_n(n);
    let mut spline = Vec::with_capacity(n + 2);
    spline.push(cubic.start());

    let mut next_q1 = cubic_approx_control(cubics[0], 0.0);
    spline.push(next_q1);
    let mut q2 = cubic.start();
    let mut d1 = Point::new(0.0, 0.0);
    for i in 1..=n {
        let Cubic([_, c1, c2, c3]) = cubics[i - 1];

        // quadratic approximation of the current piece
        let q0 = q2;
        let q1 = next_q1;
        if i < n {
            next_q1 = cubic_approx_control(cubics[i], i as Scalar / (n - 1) as Scalar);
            spline.push(next_q1);
            q2 = 0.5 * (q1 + next_q1);
        } else {
            q2 = c3;
        }

        // end point deltas, start delta is the end delta of the previous piece
        let d0 = d1;
        d1 = q2 - c3;

        let (e1, e2) = elevate(q0, q1, q2);
        if d1.length() > tolerance || !cubic_fit_inside(Cubic([d0, e1 - c1, e2 - c2, d1]), tolerance)
        {
            return None;
        }
    }
    spline.push(cubic.end());
    Spline::new(spline)
}

/// Convert cubic curve to a quadratic spline, see [`curve_to_quadratic_with`]
pub fn curve_to_quadratic(cubic: impl Into<Cubic>, max_err: Scalar) -> Result<Spline, Error> {
    curve_to_quadratic_with(cubic, max_err, &ConvertOptions::default())
}

/// Convert cubic curve to a quadratic spline with the smallest number of segments
///
/// Spline lies within `max_err` distance of the cubic. Fails with
/// [`Error::ApproxNotFound`] if more than `options.max_n` segments are required.
pub fn curve_to_quadratic_with(
    cubic: impl Into<Cubic>,
    max_err: Scalar,
    options: &ConvertOptions,
) -> Result<Spline, Error> {
    let cubic = cubic.into();
    options.validate()?;
    validate_tolerance(max_err)?;

    for n in 1..=options.max_n {
        match cubic_approx_spline(cubic, n, max_err) {
            Some(spline) => {
                tracing::debug!(?cubic, n, "[curve_to_quadratic] found");
                return Ok(spline);
            }
            None => tracing::trace!(?cubic, n, "[curve_to_quadratic] rejected"),
        }
    }
    tracing::debug!(?cubic, max_n = options.max_n, "[curve_to_quadratic] exhausted");
    Err(Error::ApproxNotFound {
        curves: vec![cubic],
    })
}

/// Convert a batch of cubic curves, see [`curves_to_quadratic_with`]
pub fn curves_to_quadratic<C>(cubics: C, max_errors: &[Scalar]) -> Result<Vec<Spline>, Error>
where
    C: IntoIterator,
    C::Item: Into<Cubic>,
{
    curves_to_quadratic_with(cubics, max_errors, &ConvertOptions::default())
}

/// Convert a batch of cubic curves to quadratic splines with the same number of segments
///
/// Curve `i` is approximated within `max_errors[i]`. All returned splines have
/// the same segment count, which keeps outlines compatible for interpolation.
/// The count is found by a round-robin search: curves are visited in a cycle and
/// the shared count is increased whenever the current curve does not fit. The
/// search completes after a full cycle without increases.
pub fn curves_to_quadratic_with<C>(
    cubics: C,
    max_errors: &[Scalar],
    options: &ConvertOptions,
) -> Result<Vec<Spline>, Error>
where
    C: IntoIterator,
    C::Item: Into<Cubic>,
{
    let cubics: Vec<Cubic> = cubics.into_iter().map(Into::into).collect();
    options.validate()?;
    if cubics.len() != max_errors.len() {
        return Err(Error::InvalidArgument {
            reason: format!(
                "{} curves given with {} tolerances",
                cubics.len(),
                max_errors.len()
            ),
        });
    }
    for max_err in max_errors {
        validate_tolerance(*max_err)?;
    }
    if cubics.is_empty() {
        return Ok(Vec::new());
    }

    let _span = tracing::debug_span!("[curves_to_quadratic]", count = cubics.len()).entered();
    let count = cubics.len();
    let mut splines: Vec<Option<Spline>> = vec![None; count];
    let mut n = 1;
    let mut i = 0;
    let mut last_i = 0;
    loop {
        match cubic_approx_spline(cubics[i], n, max_errors[i]) {
            None => {
                tracing::trace!(index = i, n, "[curves_to_quadratic] rejected");
                if n >= options.max_n {
                    break;
                }
                n += 1;
                last_i = i;
            }
            Some(spline) => {
                splines[i] = Some(spline);
                i = (i + 1) % count;
                if i == last_i {
                    tracing::debug!(n, "[curves_to_quadratic] found");
                    return Ok(splines.into_iter().flatten().collect());
                }
            }
        }
    }
    tracing::debug!(max_n = options.max_n, "[curves_to_quadratic] exhausted");
    Err(Error::ApproxNotFound { curves: cubics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    fn assert_points(points: &[Point], expected: &[(Scalar, Scalar)], eps: Scalar) {
        assert_eq!(points.len(), expected.len(), "{:?}", points);
        for (point, expected) in points.iter().zip(expected) {
            assert!(
                point.dist((*expected).into()) < eps,
                "{:?} != {:?}",
                point,
                expected
            );
        }
    }

    fn curve() -> Cubic {
        Cubic::new(
            (550.0, 258.0),
            (1044.0, 482.0),
            (2029.0, 1841.0),
            (1934.0, 1554.0),
        )
    }

    #[test]
    fn test_approx_quadratic() {
        let quad = cubic_approx_quadratic(curve(), 344.0).unwrap();
        assert_points(
            &quad.points(),
            &[
                (550.0, 258.0),
                (1673.665720592873, 767.5164401068898),
                (1934.0, 1554.0),
            ],
            1e-9,
        );
        assert!(cubic_approx_quadratic(curve(), 343.0).is_none());

        // parallel tangents on a curved cubic
        let arch = Cubic::new((0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0));
        assert!(cubic_approx_quadratic(arch, 100.0).is_none());
        assert!(cubic_approx_quadratic(arch, 1e6).is_none());
        let gentle = Cubic::new((0.0, 0.0), (30.0, 2.0), (70.0, -2.0), (100.0, 0.0));
        assert!(cubic_approx_quadratic(gentle, 2.5).is_none());

        // straight lines
        let line = Cubic::new((0.0, 0.0), (33.0, 0.0), (67.0, 0.0), (100.0, 0.0));
        let quad = cubic_approx_quadratic(line, 0.0).unwrap();
        assert_eq!(quad, Quad::new((0.0, 0.0), (50.0, 0.0), (100.0, 0.0)));
        let bumpy = Cubic::new((0.0, 0.0), (33.0, 1.0), (67.0, 1.0), (100.0, 0.0));
        assert!(cubic_approx_quadratic(bumpy, 1.0).is_some());
        let bumpy = Cubic::new((0.0, 0.0), (33.0, 1.0), (67.0, -1.0), (100.0, 0.0));
        assert!(cubic_approx_quadratic(bumpy, 1e6).is_none());
    }

    #[test]
    fn test_approx_control() {
        // rounding matches `start + t * (end - start)` bit for bit
        let curve = curve();
        assert_eq!(cubic_approx_control(curve, 0.0), Point::new(1291.0, 594.0));
        assert_eq!(
            cubic_approx_control(curve, 1.0 / 3.0),
            Point::new(1552.8333333333333, 1057.5)
        );
        assert_eq!(cubic_approx_control(curve, 0.2), Point::new(1448.1, 872.1));
        assert_eq!(cubic_approx_control(curve, 0.6), Point::new(1762.3, 1428.3));
        assert_eq!(
            cubic_approx_control(curve, 3.0 / 7.0),
            Point::new(1627.642857142857, 1189.9285714285716)
        );
    }

    #[test]
    fn test_approx_spline() {
        assert!(cubic_approx_spline(curve(), 1, 343.0).is_none());
        let spline = cubic_approx_spline(curve(), 2, 343.0).unwrap();
        assert_points(
            spline.points(),
            &[
                (550.0, 258.0),
                (920.5, 426.0),
                (2005.25, 1769.25),
                (1934.0, 1554.0),
            ],
            1e-9,
        );
        for n in 1..=5 {
            assert!(cubic_approx_spline(curve(), n, 5.0).is_none());
        }
        let spline = cubic_approx_spline(curve(), 6, 5.0).unwrap();
        assert_eq!(spline.segments_count(), 6);
        assert!(spline.max_sampled_error(curve(), 20) <= 5.0);
    }

    #[test]
    fn test_curve_to_quadratic() {
        let spline = curve_to_quadratic(curve(), 5.0).unwrap();
        assert_points(
            spline.points(),
            &[
                (550.0, 258.0),
                (673.5, 314.0),
                (984.8777777777776, 584.2666666666667),
                (1312.6305555555557, 927.825),
                (1613.1194444444443, 1267.425),
                (1842.7055555555555, 1525.8166666666666),
                (1957.75, 1625.75),
                (1934.0, 1554.0),
            ],
            1e-9,
        );
        assert_eq!(spline.start(), curve().start());
        assert_eq!(spline.end(), curve().end());
    }

    #[test]
    fn test_curves_to_quadratic() {
        let curves = [
            curve(),
            Cubic::new((859.0, 384.0), (1998.0, 116.0), (1596.0, 1772.0), (8.0, 1824.0)),
            Cubic::new((1090.0, 937.0), (418.0, 1300.0), (125.0, 91.0), (104.0, 37.0)),
        ];
        let splines = curves_to_quadratic(curves, &[5.0; 3]).unwrap();
        assert_eq!(splines.len(), 3);
        let n = splines[0].segments_count();
        for (spline, curve) in splines.iter().zip(curves) {
            assert_eq!(spline.segments_count(), n);
            assert_eq!(spline.start(), curve.start());
            assert_eq!(spline.end(), curve.end());
            assert!(spline.max_sampled_error(curve, 20) <= 5.0);
        }
        // no curve fits with fewer segments than the batch uses
        let single_max = curves
            .iter()
            .map(|c| curve_to_quadratic(*c, 5.0).unwrap().segments_count())
            .max()
            .unwrap();
        assert_eq!(n, single_max);
    }

    #[test]
    fn test_invalid_arguments() {
        let result = curves_to_quadratic([curve(), curve()], &[1.0]);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        let result = curve_to_quadratic(curve(), -1.0);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
        let result = curve_to_quadratic(curve(), Scalar::NAN);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        let options = ConvertOptions::default().with_max_n(0);
        let result = curve_to_quadratic_with(curve(), 1.0, &options);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        let empty: [Cubic; 0] = [];
        assert_eq!(curves_to_quadratic(empty, &[]), Ok(Vec::new()));
    }

    #[test]
    fn test_not_found() {
        let options = ConvertOptions::default().with_max_n(5);
        let error = curve_to_quadratic_with(curve(), 5.0, &options).unwrap_err();
        assert_eq!(
            error,
            Error::ApproxNotFound {
                curves: vec![curve()]
            }
        );
        assert!(error.to_string().starts_with("no approximation found"));

        let line = Cubic::new((0.0, 0.0), (33.0, 0.0), (67.0, 0.0), (100.0, 0.0));
        let error = curves_to_quadratic_with([line, curve()], &[1.0, 5.0], &options).unwrap_err();
        assert_eq!(
            error,
            Error::ApproxNotFound {
                curves: vec![line, curve()]
            }
        );
        let io_error: std::io::Error = error.into();
        assert_eq!(io_error.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_options() {
        assert_eq!(ConvertOptions::default().max_n, MAX_N);
        assert_eq!(ConvertOptions::default().with_max_n(7).max_n, 7);
        assert_approx_eq!(max_err_for_upem(1000.0, DEFAULT_MAX_ERR_EM), 1.0);
        assert_approx_eq!(max_err_for_upem(2048.0, DEFAULT_MAX_ERR_EM), 2.048);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_options_serde() -> Result<(), serde_json::Error> {
        let options: ConvertOptions = serde_json::from_str("{}")?;
        assert_eq!(options, ConvertOptions::default());
        let options: ConvertOptions = serde_json::from_str(r#"{"max_n": 10}"#)?;
        assert_eq!(options.max_n, 10);
        Ok(())
    }
}
