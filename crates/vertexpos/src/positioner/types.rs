//! Candidate solutions, filter predicates and positioner tolerances.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::site::Site;
use crate::Point;

/// A candidate vertex: position `p`, offset distance `t`, and the offset
/// direction `k3` towards the new site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Solution {
    pub p: Point,
    pub t: f64,
    pub k3: f64,
}

impl Solution {
    #[inline]
    pub fn new(p: Point, t: f64, k3: f64) -> Self {
        Self { p, t, k3 }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p.x.is_finite() && self.p.y.is_finite() && self.t.is_finite()
    }
}

/// Keeps solutions with `t` in the closed range `[tmin, tmax]`.
#[derive(Clone, Copy, Debug)]
pub struct TFilter {
    tmin: f64,
    tmax: f64,
}

impl TFilter {
    #[inline]
    pub fn new(tmin: f64, tmax: f64) -> Self {
        Self { tmin, tmax }
    }
    #[inline]
    pub fn accepts(&self, s: &Solution) -> bool {
        !(s.t < self.tmin || s.t > self.tmax)
    }
}

/// Keeps solutions inside the region of one site.
#[derive(Clone, Copy, Debug)]
pub struct InRegionFilter<'a> {
    site: &'a Site,
}

impl<'a> InRegionFilter<'a> {
    #[inline]
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }
    #[inline]
    pub fn accepts(&self, s: &Solution) -> bool {
        self.site.in_region(s.p)
    }
}

/// Rule for choosing among several candidates that pass every filter.
/// Remaining ties fall back to ascending `t`, then `x`, then `y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TieBreak {
    #[default]
    MinEdgeError,
    MinT,
}

/// Positioner tolerances.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PositionerCfg {
    /// Relative threshold below which a kernel pivot/determinant is singular.
    pub eps_det: f64,
    /// Relative threshold below which the discriminant counts as zero.
    pub eps_disc: f64,
    /// `equal(d1, d2)`: relative tolerance.
    pub dist_rel_tol: f64,
    /// `equal(d1, d2)`: absolute floor for distances near zero.
    pub dist_abs_tol: f64,
    /// `solution_on_edge`: accept `edge_error <= edge_tol * max(1, t)`.
    pub edge_tol: f64,
    /// `check_far_circle`: accept `|p| < far_factor * far_radius`.
    pub far_factor: f64,
    /// Widening of `[t_min, t_max]`; zero keeps the exact closed range.
    pub t_slack: f64,
    pub tie_break: TieBreak,
}

impl Default for PositionerCfg {
    fn default() -> Self {
        Self {
            eps_det: 1e-12,
            eps_disc: 1e-20,
            dist_rel_tol: 1e-6,
            dist_abs_tol: 1e-12,
            edge_tol: 1e-6,
            far_factor: 18.0,
            t_slack: 0.0,
            tie_break: TieBreak::MinEdgeError,
        }
    }
}
