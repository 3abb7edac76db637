//! Conversion of cubic bezier curves to quadratic splines within a tolerance bound.
//!
//! Main features:
//!  - Single curve conversion with the smallest number of quadratic segments
//!  - Batch conversion where all curves end up with the same number of segments,
//!    which keeps outlines of interpolatable font masters compatible
//!  - Conservative error bound, splines never leave the tolerance of the cubic
//!
#![deny(warnings)]

mod convert;
mod curve;
mod fit;
mod geometry;
mod spline;
mod utils;

pub use convert::{
    ConvertOptions, DEFAULT_MAX_ERR_EM, Error, MAX_N, cubic_approx_quadratic,
    cubic_approx_spline, curve_to_quadratic, curve_to_quadratic_with, curves_to_quadratic,
    curves_to_quadratic_with, max_err_for_upem,
};
pub use curve::{Cubic, Curve, Line, Quad};
pub use fit::{MAX_FIT_DEPTH, cubic_fit_inside};
pub use geometry::{EPSILON, Point, Scalar, scalar_fmt};
pub use spline::{Spline, SplineStats};
pub use utils::lerp;
