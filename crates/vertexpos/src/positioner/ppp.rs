//! Closed-form solver for three point sites (circumcenter).

use super::types::Solution;
use crate::site::Site;
use crate::Point;

/// Strategy for site compositions with a dedicated closed form.
pub trait Solver {
    /// The vertex equidistant to the three sites, or `None` if the
    /// configuration is degenerate or not handled by this strategy.
    fn solve(&self, s1: &Site, k1: f64, s2: &Site, k2: f64, s3: &Site, k3: f64)
        -> Option<Solution>;
}

/// Point/point/point solver.
#[derive(Clone, Copy, Debug)]
pub struct PppSolver {
    /// Relative threshold on the orientation determinant.
    pub eps_collinear: f64,
}

impl Default for PppSolver {
    fn default() -> Self {
        Self {
            eps_collinear: 1e-14,
        }
    }
}

/// `p` strictly right of the directed line `a → b`.
#[inline]
fn is_right(p: Point, a: Point, b: Point) -> bool {
    let ab = b - a;
    let ap = p - a;
    ab.x * ap.y - ab.y * ap.x < 0.0
}

impl Solver for PppSolver {
    fn solve(
        &self,
        s1: &Site,
        _k1: f64,
        s2: &Site,
        _k2: f64,
        s3: &Site,
        _k3: f64,
    ) -> Option<Solution> {
        let (mut pi, mut pj, mut pk) = (s1.position()?, s2.position()?, s3.position()?);
        // Counter-clockwise order, then rotate so that pi-pj is the longest side.
        if is_right(pi, pj, pk) {
            std::mem::swap(&mut pi, &mut pj);
        }
        for _ in 0..2 {
            let longest = (pi - pj).norm();
            if (pj - pk).norm() > longest || (pi - pk).norm() > longest {
                (pi, pj, pk) = (pk, pi, pj);
            } else {
                break;
            }
        }
        let di = pi - pk;
        let dj = pj - pk;
        let j2 = di.y * dj.norm_squared() / 2.0 - dj.y * di.norm_squared() / 2.0;
        let j3 = di.x * dj.norm_squared() / 2.0 - dj.x * di.norm_squared() / 2.0;
        let j4 = di.x * dj.y - dj.x * di.y;
        if !j4.is_finite() || j4.abs() <= self.eps_collinear * di.norm() * dj.norm() {
            return None;
        }
        let center = Point::new(-j2 / j4 + pk.x, j3 / j4 + pk.y);
        let t = (center - pi).norm();
        Some(Solution::new(center, t, 1.0))
    }
}
