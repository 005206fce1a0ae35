//! Equation reduction and the two generic kernels.
//!
//! - `reduce`: subtract the first quadratic equation from every other
//!   quadratic one. The `x² + y² − t²` terms cancel, so any site mix becomes
//!   three linear equations or one quadratic plus two linear equations.
//! - `lll_solver`: 3×3 linear system by Cramer's rule, at most one solution.
//! - `qll_solver`: eliminate two unknowns with the linear pair, solve the
//!   remaining quadratic, back-substitute. Zero, one or two solutions.
//!
//! All coefficient arithmetic is double-double; only the final
//! `(x, y, t)` is rounded to f64.

use tracing::trace;

use super::types::{PositionerCfg, Solution};
use crate::numeric::{quadratic_roots, DoubleDouble};
use crate::site::OffsetEq;
use crate::Point;

/// A three-site system after quadratic terms have been eliminated where possible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reduced {
    Linear([OffsetEq; 3]),
    QuadLinear { quad: OffsetEq, lins: [OffsetEq; 2] },
}

pub fn reduce(eqns: [OffsetEq; 3]) -> Reduced {
    let mut quad: Option<OffsetEq> = None;
    let mut lins: Vec<OffsetEq> = Vec::with_capacity(3);
    for eq in eqns {
        if eq.is_linear() {
            lins.push(eq);
        } else if let Some(q0) = quad {
            lins.push(eq - q0);
        } else {
            quad = Some(eq);
        }
    }
    match quad {
        None => Reduced::Linear([lins[0], lins[1], lins[2]]),
        Some(quad) => Reduced::QuadLinear {
            quad,
            lins: [lins[0], lins[1]],
        },
    }
}

/// Solve a reduced system for offset direction `k3`.
pub fn solve_reduced(sys: &Reduced, k3: f64, cfg: &PositionerCfg) -> Vec<Solution> {
    match sys {
        Reduced::Linear(eqns) => lll_solver(eqns, k3, cfg).into_iter().collect(),
        Reduced::QuadLinear { quad, lins } => qll_solver(lins, quad, k3, cfg),
    }
}

#[inline]
fn det2(a: DoubleDouble, b: DoubleDouble, c: DoubleDouble, d: DoubleDouble) -> DoubleDouble {
    a * d - b * c
}

fn det3(m: &[[DoubleDouble; 3]; 3]) -> DoubleDouble {
    m[0][0] * det2(m[1][1], m[1][2], m[2][1], m[2][2])
        - m[0][1] * det2(m[1][0], m[1][2], m[2][0], m[2][2])
        + m[0][2] * det2(m[1][0], m[1][1], m[2][0], m[2][1])
}

#[inline]
fn max_abs(v: &[DoubleDouble]) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs().hi))
}

/// Three linear equations `a·x + b·y + k·t = −c`.
///
/// Returns `None` when the system is singular relative to its row scales
/// (parallel or coincident constraints).
pub fn lll_solver(eqns: &[OffsetEq; 3], k3: f64, cfg: &PositionerCfg) -> Option<Solution> {
    let m = eqns.map(|e| e.linear_coeffs());
    let rhs = eqns.map(|e| -e.c);
    let scale: f64 = m.iter().map(|row| max_abs(row)).product();
    let det = det3(&m);
    if !det.is_finite() || scale == 0.0 || det.abs().hi <= cfg.eps_det * scale {
        trace!(det = det.hi, scale, "lll: singular system");
        return None;
    }
    let mut sol = [DoubleDouble::ZERO; 3];
    for (col, out) in sol.iter_mut().enumerate() {
        let mut mc = m;
        for (row, r) in mc.iter_mut().enumerate() {
            r[col] = rhs[row];
        }
        *out = det3(&mc) / det;
    }
    let s = Solution::new(Point::new(sol[0].to_f64(), sol[1].to_f64()), sol[2].to_f64(), k3);
    s.is_finite().then_some(s)
}

/// Role assignments `(xi, yi, ti)`: the first two unknowns are eliminated in
/// terms of the third. Indices refer to the variable order `(x, y, t)`.
const ROLES: [[usize; 3]; 3] = [[0, 1, 2], [2, 0, 1], [1, 2, 0]];

/// One quadratic and two linear equations.
///
/// The role assignment with the largest 2×2 pivot is used; if every pivot is
/// negligible the linear pair does not determine a line in `(x, y, t)` and no
/// candidate is produced.
pub fn qll_solver(
    lins: &[OffsetEq; 2],
    quad: &OffsetEq,
    k3: f64,
    cfg: &PositionerCfg,
) -> Vec<Solution> {
    let l0 = lins[0].linear_coeffs();
    let l1 = lins[1].linear_coeffs();
    let scale = max_abs(&l0) * max_abs(&l1);

    let mut best: Option<([usize; 3], DoubleDouble)> = None;
    for role in ROLES {
        let [xi, yi, _] = role;
        let d = det2(l0[xi], l0[yi], l1[xi], l1[yi]);
        if best.as_ref().is_none_or(|(_, bd)| d.abs() > bd.abs()) {
            best = Some((role, d));
        }
    }
    let Some(([xi, yi, ti], det)) = best else {
        return Vec::new();
    };
    if !det.is_finite() || scale == 0.0 || det.abs().hi <= cfg.eps_det * scale {
        trace!(det = det.hi, scale, "qll: no usable pivot");
        return Vec::new();
    }

    // u_xi = a1 + b1·w,  u_yi = a2 + b2·w,  with w = u_ti
    let (c0, c1) = (lins[0].c, lins[1].c);
    let a1 = (l0[yi] * c1 - l1[yi] * c0) / det;
    let b1 = (l0[yi] * l1[ti] - l1[yi] * l0[ti]) / det;
    let a2 = (l1[xi] * c0 - l0[xi] * c1) / det;
    let b2 = (l1[xi] * l0[ti] - l0[xi] * l1[ti]) / det;

    let sq = quad.square_coeffs();
    let lin = quad.linear_coeffs();
    let roots = qll_solve(
        [sq[xi], sq[yi], sq[ti], lin[xi], lin[yi], lin[ti], quad.c],
        [a1, b1],
        [a2, b2],
        cfg,
    );
    roots
        .into_iter()
        .filter_map(|w| {
            let mut u = [DoubleDouble::ZERO; 3];
            u[xi] = a1 + b1 * w;
            u[yi] = a2 + b2 * w;
            u[ti] = w;
            let s = Solution::new(Point::new(u[0].to_f64(), u[1].to_f64()), u[2].to_f64(), k3);
            s.is_finite().then_some(s)
        })
        .collect()
}

/// Solve
/// - `a0·u² + b0·v² + c0·w² + d0·u + e0·v + f0·w + g0 = 0`
/// - `u = a1 + b1·w`
/// - `v = a2 + b2·w`
///
/// for `w`. The quadratic coefficients are passed as `[a0, b0, c0, d0, e0, f0, g0]`.
pub fn qll_solve(
    quad: [DoubleDouble; 7],
    [a1, b1]: [DoubleDouble; 2],
    [a2, b2]: [DoubleDouble; 2],
    cfg: &PositionerCfg,
) -> Vec<DoubleDouble> {
    let [a0, b0, c0, d0, e0, f0, g0] = quad;
    let mut a = a0 * b1.sqr() + b0 * b2.sqr() + c0;
    let b = (a0 * a1 * b1 + b0 * a2 * b2) * 2.0 + d0 * b1 + e0 * b2 + f0;
    let c = a0 * a1.sqr() + b0 * a2.sqr() + d0 * a1 + e0 * a2 + g0;
    // The leading coefficient only depends on the direction of the solution
    // line, so its own terms set the scale; `b` and `c` grow with translation.
    let lead_scale = (a0.abs() * b1.sqr() + b0.abs() * b2.sqr() + c0.abs()).hi;
    if a.abs().hi <= cfg.eps_det * lead_scale {
        trace!(a = a.hi, lead_scale, "qll: leading term cancels, linear solve");
        a = DoubleDouble::ZERO;
    }
    let roots = quadratic_roots(a, b, c, cfg.eps_disc);
    trace!(n = roots.len(), "qll: roots");
    roots.iter().collect()
}
