//! Error bound check used to accept or reject quadratic candidates
use crate::{Cubic, Curve, Scalar};

/// Maximum number of bisections performed by [`cubic_fit_inside`]
///
/// Each level halves the parameter interval, at this depth pieces of any
/// realistic outline are far below floating point resolution of its coordinates.
pub const MAX_FIT_DEPTH: usize = 32;

/// Determine if the cubic lies entirely within `tolerance` distance of the origin.
///
/// The curve usually describes the difference between a cubic and its approximation,
/// so the origin plays the role of the reference curve. End points are assumed to
/// be checked by the caller, only the inside of the curve is examined. The test is
/// conservative: it never accepts a curve which leaves the tolerance disk, but it
/// can reject curves that barely fit.
pub fn cubic_fit_inside(cubic: Cubic, tolerance: Scalar) -> bool {
    cubic_fit_inside_rec(cubic, tolerance, 0)
}

fn cubic_fit_inside_rec(cubic: Cubic, tolerance: Scalar, depth: usize) -> bool {
    let Cubic([p0, p1, p2, p3]) = cubic;
    // p2 is checked first as it has higher error early on
    if p2.length() <= tolerance && p1.length() <= tolerance {
        return true;
    }
    let mid = 0.125 * (p0 + 3.0 * (p1 + p2) + p3);
    if mid.length() > tolerance || depth >= MAX_FIT_DEPTH {
        return false;
    }
    let (c0, c1) = cubic.split();
    cubic_fit_inside_rec(c0, tolerance, depth + 1) && cubic_fit_inside_rec(c1, tolerance, depth + 1)
}
