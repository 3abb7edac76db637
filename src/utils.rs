//! Utility functions used accross the library
use crate::Scalar;
use std::ops::{Add, Mul};

/// Linear interpolation `a * (1 - t) + b * t`, works for scalars and points
#[inline]
pub fn lerp<T>(a: T, b: T, t: Scalar) -> T
where
    T: Add<Output = T>,
    Scalar: Mul<T, Output = T>,
{
    (1.0 - t) * a + t * b
}
