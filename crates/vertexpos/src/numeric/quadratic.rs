//! Real roots of `a·u² + b·u + c = 0` in double-double precision.

use super::DoubleDouble;

/// Zero, one (double or linear) or two real roots; two roots are ascending.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Roots {
    None,
    One(DoubleDouble),
    Two(DoubleDouble, DoubleDouble),
}

impl Roots {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Roots::None => 0,
            Roots::One(_) => 1,
            Roots::Two(..) => 2,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Roots::None)
    }

    pub fn iter(&self) -> impl Iterator<Item = DoubleDouble> {
        let (arr, n) = match *self {
            Roots::None => ([DoubleDouble::ZERO; 2], 0),
            Roots::One(r) => ([r, DoubleDouble::ZERO], 1),
            Roots::Two(r1, r2) => ([r1, r2], 2),
        };
        arr.into_iter().take(n)
    }
}

/// Solve `a·u² + b·u + c = 0`.
///
/// - `a == 0`: linear solve `b·u + c = 0`. Callers decide when a tiny `a` is
///   negligible and pass zero; only they know the scale `a` was built from.
/// - `eps_disc`: the discriminant is chopped to zero when
///   `|b² − 4ac| <= eps_disc·max(b², |4ac|)`, giving exactly one root.
pub fn quadratic_roots(
    a: DoubleDouble,
    b: DoubleDouble,
    c: DoubleDouble,
    eps_disc: f64,
) -> Roots {
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return Roots::None;
    }
    if a.is_zero() {
        if b.is_zero() {
            return Roots::None;
        }
        return Roots::One(-(c / b));
    }
    let b2 = b.sqr();
    let four_ac = a * c * 4.0;
    let disc = b2 - four_ac;
    let disc_scale = b2.max(four_ac.abs());
    if disc.abs().hi <= eps_disc * disc_scale.hi {
        return Roots::One(-(b / (a * 2.0)));
    }
    if disc.is_sign_negative() {
        return Roots::None;
    }
    let sgn = if b.is_sign_negative() { -1.0 } else { 1.0 };
    let q = -(b + disc.sqrt() * sgn) * 0.5;
    let r1 = q / a;
    let r2 = c / q;
    if r1 <= r2 {
        Roots::Two(r1, r2)
    } else {
        Roots::Two(r2, r1)
    }
}
