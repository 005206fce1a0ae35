//! Double-double arithmetic: an unevaluated sum `hi + lo` of two `f64`.
//!
//! Purpose
//! - Give the vertex kernels ~106 bits of mantissa for the coefficient products
//!   and differences that cancel badly in near-parallel or near-collinear
//!   site configurations.
//!
//! Model
//! - Error-free transforms (`two_sum`, `quick_two_sum`, `two_prod`) keep the
//!   rounding error of each f64 operation in the low word.
//! - Invariant: `|lo| <= ulp(hi) / 2`; every operation renormalizes.
//!
//! References
//! - Code cross-refs: `numeric::quadratic_roots`, `positioner::kernels`

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

#[inline]
pub(crate) fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

/// Requires `|a| >= |b|`.
#[inline]
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    (s, b - (s - a))
}

#[inline]
pub(crate) fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    (p, a.mul_add(b, -p))
}

/// Extended-precision real, `hi + lo`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DoubleDouble {
    pub hi: f64,
    pub lo: f64,
}

impl DoubleDouble {
    pub const ZERO: Self = Self { hi: 0.0, lo: 0.0 };
    pub const ONE: Self = Self { hi: 1.0, lo: 0.0 };

    /// Build from two arbitrary words; the pair is renormalized.
    #[inline]
    pub fn new(hi: f64, lo: f64) -> Self {
        let (hi, lo) = two_sum(hi, lo);
        Self { hi, lo }
    }

    /// Nearest f64.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.hi + self.lo
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.hi == 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.hi.is_finite() && self.lo.is_finite()
    }

    #[inline]
    pub fn is_sign_negative(self) -> bool {
        self.hi < 0.0
    }

    #[inline]
    pub fn abs(self) -> Self {
        if self.hi < 0.0 {
            -self
        } else {
            self
        }
    }

    /// `+1`, `-1`, or `0` following the sign of the leading word.
    #[inline]
    pub fn signum(self) -> f64 {
        if self.hi > 0.0 {
            1.0
        } else if self.hi < 0.0 {
            -1.0
        } else {
            0.0
        }
    }

    #[inline]
    pub fn sqr(self) -> Self {
        let (p1, mut p2) = two_prod(self.hi, self.hi);
        p2 += 2.0 * self.hi * self.lo;
        p2 += self.lo * self.lo;
        let (hi, lo) = quick_two_sum(p1, p2);
        Self { hi, lo }
    }

    /// Square root by one Newton step on the f64 estimate. Negative input gives NaN.
    pub fn sqrt(self) -> Self {
        if self.hi == 0.0 {
            return Self::ZERO;
        }
        if self.hi < 0.0 {
            return Self {
                hi: f64::NAN,
                lo: f64::NAN,
            };
        }
        let x = 1.0 / self.hi.sqrt();
        let ax = self.hi * x;
        let corr = (self - Self::from(ax).sqr()).hi * (x * 0.5);
        let (hi, lo) = two_sum(ax, corr);
        Self { hi, lo }
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }

    #[inline]
    fn mul_f64(self, b: f64) -> Self {
        let (p1, mut p2) = two_prod(self.hi, b);
        p2 += self.lo * b;
        let (hi, lo) = quick_two_sum(p1, p2);
        Self { hi, lo }
    }
}

impl From<f64> for DoubleDouble {
    #[inline]
    fn from(v: f64) -> Self {
        Self { hi: v, lo: 0.0 }
    }
}

impl PartialOrd for DoubleDouble {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.hi.partial_cmp(&other.hi)? {
            Ordering::Equal => self.lo.partial_cmp(&other.lo),
            o => Some(o),
        }
    }
}

impl Neg for DoubleDouble {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

impl Add for DoubleDouble {
    type Output = Self;
    #[inline]
    fn add(self, b: Self) -> Self {
        let (s1, s2) = two_sum(self.hi, b.hi);
        let (t1, t2) = two_sum(self.lo, b.lo);
        let (s1, s2) = quick_two_sum(s1, s2 + t1);
        let (hi, lo) = quick_two_sum(s1, s2 + t2);
        Self { hi, lo }
    }
}

impl Sub for DoubleDouble {
    type Output = Self;
    #[inline]
    fn sub(self, b: Self) -> Self {
        self + (-b)
    }
}

impl Mul for DoubleDouble {
    type Output = Self;
    #[inline]
    fn mul(self, b: Self) -> Self {
        let (p1, mut p2) = two_prod(self.hi, b.hi);
        p2 += self.hi * b.lo + self.lo * b.hi;
        let (hi, lo) = quick_two_sum(p1, p2);
        Self { hi, lo }
    }
}

impl Div for DoubleDouble {
    type Output = Self;
    /// Long division with three f64 quotient digits.
    fn div(self, b: Self) -> Self {
        let q1 = self.hi / b.hi;
        let r = self - b.mul_f64(q1);
        let q2 = r.hi / b.hi;
        let r = r - b.mul_f64(q2);
        let q3 = r.hi / b.hi;
        let (hi, lo) = quick_two_sum(q1, q2);
        Self { hi, lo } + Self::from(q3)
    }
}

macro_rules! f64_rhs {
    ($($tr:ident :: $f:ident),*) => {$(
        impl $tr<f64> for DoubleDouble {
            type Output = DoubleDouble;
            #[inline]
            fn $f(self, rhs: f64) -> DoubleDouble {
                $tr::$f(self, DoubleDouble::from(rhs))
            }
        }
    )*};
}
f64_rhs!(Add::add, Sub::sub, Mul::mul, Div::div);

impl AddAssign for DoubleDouble {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for DoubleDouble {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for DoubleDouble {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
