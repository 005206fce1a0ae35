//! Sites (point, line segment, circular arc) and their offset equations.
//!
//! Every site kind states "the point (x, y) lies at offset distance t" as
//!
//! `q·(x² + y² − t²) + a·x + b·y + k·t + c = 0`
//!
//! with `q = 0` for lines and `q = 1` for points and arcs. The offset
//! direction sign (±1) of the caller multiplies `k`.
//!
//! References
//! - Code cross-refs: `positioner::kernels::{reduce, lll_solver, qll_solver}`

use std::f64::consts::TAU;
use std::ops::Sub;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PositionError;
use crate::numeric::DoubleDouble;
use crate::Point;

/// Slack on the segment projection parameter and arc sweep angle.
pub(crate) const REGION_EPS: f64 = 1e-9;

/// Relative mismatch allowed between `|start − center|` and `|end − center|`.
pub const ARC_RADIUS_TOL: f64 = 1e-6;

/// Offset equation `q·(x²+y²−t²) + a·x + b·y + k·t + c = 0` in extended precision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetEq {
    pub q: DoubleDouble,
    pub a: DoubleDouble,
    pub b: DoubleDouble,
    pub k: DoubleDouble,
    pub c: DoubleDouble,
}

impl OffsetEq {
    #[inline]
    pub fn is_linear(&self) -> bool {
        self.q.is_zero()
    }

    /// Coefficients of the linear part in variable order `(x, y, t)`.
    #[inline]
    pub fn linear_coeffs(&self) -> [DoubleDouble; 3] {
        [self.a, self.b, self.k]
    }

    /// Coefficients of the squared terms in variable order `(x, y, t)`.
    #[inline]
    pub fn square_coeffs(&self) -> [DoubleDouble; 3] {
        [self.q, self.q, -self.q]
    }

    pub fn eval(&self, x: DoubleDouble, y: DoubleDouble, t: DoubleDouble) -> DoubleDouble {
        self.q * (x.sqr() + y.sqr() - t.sqr()) + self.a * x + self.b * y + self.k * t + self.c
    }

    /// Residual at an f64 solution `(p, t)`.
    pub fn residual(&self, p: Point, t: f64) -> f64 {
        self.eval(p.x.into(), p.y.into(), t.into()).to_f64()
    }
}

impl Sub for OffsetEq {
    type Output = OffsetEq;
    #[inline]
    fn sub(self, rhs: OffsetEq) -> OffsetEq {
        OffsetEq {
            q: self.q - rhs.q,
            a: self.a - rhs.a,
            b: self.b - rhs.b,
            k: self.k - rhs.k,
            c: self.c - rhs.c,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointSite {
    pub p: Point,
}

/// Segment `start → end`; offset direction `+1` is the left side.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineSite {
    pub start: Point,
    pub end: Point,
}

/// Circular arc around `center` from `start` to `end`, counter-clockwise if `ccw`.
/// Offset direction `+1` grows the radius, `-1` shrinks it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArcSite {
    pub start: Point,
    pub end: Point,
    pub center: Point,
    pub ccw: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Site {
    Point(PointSite),
    Line(LineSite),
    Arc(ArcSite),
}

impl Site {
    #[inline]
    pub fn point(x: f64, y: f64) -> Self {
        Site::Point(PointSite {
            p: Point::new(x, y),
        })
    }

    #[inline]
    pub fn line(start: Point, end: Point) -> Self {
        Site::Line(LineSite { start, end })
    }

    #[inline]
    pub fn arc(start: Point, end: Point, center: Point, ccw: bool) -> Self {
        Site::Arc(ArcSite {
            start,
            end,
            center,
            ccw,
        })
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        matches!(self, Site::Point(_))
    }

    /// Location of a point site.
    #[inline]
    pub fn position(&self) -> Option<Point> {
        match self {
            Site::Point(ps) => Some(ps.p),
            _ => None,
        }
    }

    /// Reject geometry whose offset equation is undefined.
    pub fn validate(&self) -> Result<(), PositionError> {
        let finite = |p: &Point| p.x.is_finite() && p.y.is_finite();
        match self {
            Site::Point(ps) if !finite(&ps.p) => Err(PositionError::InvalidSite("non-finite point")),
            Site::Point(_) => Ok(()),
            Site::Line(ls) => {
                if !finite(&ls.start) || !finite(&ls.end) {
                    Err(PositionError::InvalidSite("non-finite line endpoint"))
                } else if (ls.end - ls.start).norm() == 0.0 {
                    Err(PositionError::InvalidSite("zero-length line"))
                } else {
                    Ok(())
                }
            }
            Site::Arc(arc) => {
                if !finite(&arc.start) || !finite(&arc.end) || !finite(&arc.center) {
                    Err(PositionError::InvalidSite("non-finite arc geometry"))
                } else if arc.radius() == 0.0 {
                    Err(PositionError::InvalidSite("zero-radius arc"))
                } else if ((arc.end - arc.center).norm() - arc.radius()).abs()
                    > ARC_RADIUS_TOL * arc.radius()
                {
                    Err(PositionError::InvalidSite("arc endpoints at different radii"))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Offset equation for offset direction `dir` (±1).
    pub fn eqn(&self, dir: f64) -> OffsetEq {
        match self {
            Site::Point(ps) => ps.eqn(),
            Site::Line(ls) => ls.eqn(dir),
            Site::Arc(arc) => arc.eqn(dir),
        }
    }

    /// Whether `p` lies in the part of the plane this site is responsible for.
    pub fn in_region(&self, p: Point) -> bool {
        match self {
            Site::Point(_) => true,
            Site::Line(ls) => ls.in_region(p),
            Site::Arc(arc) => arc.in_region(p),
        }
    }

    /// Closest point of the site to `p`.
    pub fn apex_point(&self, p: Point) -> Point {
        match self {
            Site::Point(ps) => ps.p,
            Site::Line(ls) => ls.apex_point(p),
            Site::Arc(arc) => arc.apex_point(p),
        }
    }

    #[inline]
    pub fn distance(&self, p: Point) -> f64 {
        (p - self.apex_point(p)).norm()
    }
}

impl PointSite {
    fn eqn(&self) -> OffsetEq {
        let x = DoubleDouble::from(self.p.x);
        let y = DoubleDouble::from(self.p.y);
        OffsetEq {
            q: DoubleDouble::ONE,
            a: x * -2.0,
            b: y * -2.0,
            k: DoubleDouble::ZERO,
            c: x.sqr() + y.sqr(),
        }
    }
}

impl LineSite {
    fn eqn(&self, dir: f64) -> OffsetEq {
        let (sx, sy) = (DoubleDouble::from(self.start.x), DoubleDouble::from(self.start.y));
        let (ex, ey) = (DoubleDouble::from(self.end.x), DoubleDouble::from(self.end.y));
        let a = ey - sy;
        let b = sx - ex;
        let c = ex * sy - sx * ey;
        let len = (a.sqr() + b.sqr()).sqrt();
        OffsetEq {
            q: DoubleDouble::ZERO,
            a: a / len,
            b: b / len,
            k: DoubleDouble::from(dir),
            c: c / len,
        }
    }

    /// Projection parameter of `p` onto the segment; `[0, 1]` inside.
    #[inline]
    pub fn in_region_t(&self, p: Point) -> f64 {
        let d = self.end - self.start;
        (p - self.start).dot(&d) / d.norm_squared()
    }

    #[inline]
    pub fn in_region(&self, p: Point) -> bool {
        let t = self.in_region_t(p);
        (-REGION_EPS..=1.0 + REGION_EPS).contains(&t)
    }

    pub fn apex_point(&self, p: Point) -> Point {
        let t = self.in_region_t(p).clamp(0.0, 1.0);
        self.start + (self.end - self.start) * t
    }
}

/// Counter-clockwise angle from `u` to `w`, in `[0, 2π)`.
#[inline]
fn ccw_angle(u: Point, w: Point) -> f64 {
    (w.y.atan2(w.x) - u.y.atan2(u.x)).rem_euclid(TAU)
}

impl ArcSite {
    #[inline]
    pub fn radius(&self) -> f64 {
        (self.start - self.center).norm()
    }

    fn eqn(&self, dir: f64) -> OffsetEq {
        let cx = DoubleDouble::from(self.center.x);
        let cy = DoubleDouble::from(self.center.y);
        let r2 = (DoubleDouble::from(self.start.x) - cx).sqr()
            + (DoubleDouble::from(self.start.y) - cy).sqr();
        let r = r2.sqrt();
        OffsetEq {
            q: DoubleDouble::ONE,
            a: cx * -2.0,
            b: cy * -2.0,
            k: r * (-2.0 * dir),
            c: cx.sqr() + cy.sqr() - r2,
        }
    }

    /// Angular span swept counter-clockwise from the first endpoint; a closed arc spans 2π.
    fn sweep(&self) -> (Point, f64) {
        let (from, to) = if self.ccw {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        let u = from - self.center;
        let span = ccw_angle(u, to - self.center);
        if span <= REGION_EPS {
            (u, TAU)
        } else {
            (u, span)
        }
    }

    pub fn in_region(&self, p: Point) -> bool {
        let v = p - self.center;
        if v.norm() <= REGION_EPS * self.radius().max(1.0) {
            return true;
        }
        let (u, span) = self.sweep();
        let ang = ccw_angle(u, v);
        ang <= span + REGION_EPS || ang >= TAU - REGION_EPS
    }

    pub fn apex_point(&self, p: Point) -> Point {
        let v = p - self.center;
        let n = v.norm();
        if n > 0.0 && self.in_region(p) {
            return self.center + v * (self.radius() / n);
        }
        if n == 0.0 {
            return self.start;
        }
        if (p - self.start).norm() <= (p - self.end).norm() {
            self.start
        } else {
            self.end
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn point_equation_vanishes_on_offset_circle() {
        let s = Site::point(1.0, -2.0);
        let eq = s.eqn(1.0);
        assert!(!eq.is_linear());
        // (4, 2) is at distance 5 from (1, -2)
        assert!(eq.residual(vector![4.0, 2.0], 5.0).abs() < 1e-12);
        assert!(eq.residual(vector![4.0, 2.0], 4.0).abs() > 1.0);
    }

    #[test]
    fn line_equation_sign_selects_left_side() {
        let s = Site::line(vector![0.0, 0.0], vector![10.0, 0.0]);
        let left = s.eqn(1.0);
        let right = s.eqn(-1.0);
        assert!(left.is_linear());
        assert!(left.residual(vector![3.0, 2.0], 2.0).abs() < 1e-15);
        assert!(right.residual(vector![3.0, -2.0], 2.0).abs() < 1e-15);
        assert!(left.residual(vector![3.0, -2.0], 2.0).abs() > 1.0);
    }

    #[test]
    fn line_region_and_apex() {
        let s = Site::line(vector![0.0, 0.0], vector![4.0, 0.0]);
        assert!(s.in_region(vector![2.0, 5.0]));
        assert!(s.in_region(vector![0.0, -1.0]));
        assert!(!s.in_region(vector![-0.5, 1.0]));
        assert_eq!(s.apex_point(vector![2.0, 5.0]), vector![2.0, 0.0]);
        assert_eq!(s.apex_point(vector![6.0, 3.0]), vector![4.0, 0.0]);
        assert!((s.distance(vector![7.0, 4.0]) - 5.0).abs() < 1e-15);
    }

    #[test]
    fn arc_equation_grows_and_shrinks_radius() {
        let s = Site::arc(vector![1.0, 0.0], vector![0.0, 1.0], vector![0.0, 0.0], true);
        let out = s.eqn(1.0);
        let inw = s.eqn(-1.0);
        // outward: |p| = r + t
        assert!(out.residual(vector![1.5, 0.0], 0.5).abs() < 1e-15);
        // inward: |p| = r - t
        assert!(inw.residual(vector![0.25, 0.0], 0.75).abs() < 1e-15);
    }

    #[test]
    fn arc_region_follows_sweep_direction() {
        let quarter_ccw = Site::arc(vector![1.0, 0.0], vector![0.0, 1.0], vector![0.0, 0.0], true);
        assert!(quarter_ccw.in_region(vector![1.0, 1.0]));
        assert!(!quarter_ccw.in_region(vector![-1.0, -1.0]));
        assert!(quarter_ccw.in_region(vector![0.0, 0.0]));
        // Same endpoints, clockwise: the three-quarter complement.
        let three_quarter_cw =
            Site::arc(vector![1.0, 0.0], vector![0.0, 1.0], vector![0.0, 0.0], false);
        assert!(!three_quarter_cw.in_region(vector![1.0, 1.0]));
        assert!(three_quarter_cw.in_region(vector![-1.0, -1.0]));
        // Apex projects radially in region, snaps to an endpoint outside.
        let apex = quarter_ccw.apex_point(vector![2.0, 2.0]);
        assert!((apex - vector![0.5f64.sqrt(), 0.5f64.sqrt()]).norm() < 1e-15);
        assert_eq!(quarter_ccw.apex_point(vector![3.0, -1.0]), vector![1.0, 0.0]);
    }

    #[test]
    fn difference_of_quadratics_is_linear() {
        let e = Site::point(1.0, 0.0).eqn(1.0) - Site::point(-1.0, 0.0).eqn(1.0);
        assert!(e.is_linear());
        // Bisector of (±1, 0) is x = 0, for any t.
        assert!(e.residual(vector![0.0, 3.0], 7.0).abs() < 1e-15);
    }

    #[test]
    fn validate_rejects_degenerate_geometry() {
        let p = vector![1.0, 1.0];
        assert!(Site::line(p, p).validate().is_err());
        assert!(Site::arc(p, p, p, true).validate().is_err());
        // End point off the circle through the start point.
        let c = vector![0.0, 0.0];
        let off_circle = Site::arc(vector![1.0, 0.0], vector![0.0, 1.5], c, true);
        assert!(matches!(off_circle.validate(), Err(PositionError::InvalidSite(_))));
        let on_circle = Site::arc(vector![1.0, 0.0], vector![0.0, 1.0 + 1e-9], c, true);
        assert!(on_circle.validate().is_ok());
        assert!(Site::point(f64::NAN, 0.0).validate().is_err());
        assert!(Site::point(0.0, 0.0).validate().is_ok());
    }
}
