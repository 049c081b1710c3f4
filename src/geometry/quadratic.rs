use arrayvec::ArrayVec;

use super::{EPSILON, FloatType};

/// Real roots of `a * t^2 + b * t + c = 0`, in ascending order.
///
/// Returns no roots when the discriminant is negative or when `a` is too close to zero for the
/// equation to be treated as a quadratic. A double root is reported twice.
pub fn solve_quadratic(a: FloatType, b: FloatType, c: FloatType) -> ArrayVec<FloatType, 2> {
    let mut roots = ArrayVec::new();

    if a.abs() < EPSILON {
        return roots;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return roots;
    }

    // Avoids cancellation between -b and the square root
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    if q == 0.0 {
        // b == 0 and c == 0
        roots.push(0.0);
        roots.push(0.0);
        return roots;
    }

    let t0 = q / a;
    let t1 = c / q;
    roots.push(t0.min(t1));
    roots.push(t0.max(t1));
    roots
}
